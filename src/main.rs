use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::{AnalysisConfig, BarInterval, bars_for_lookback, load_config};
use core_types::{Bar, CurrentPrices};
use engine::{AnalysisReport, EngineError, PairAnalyzer};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the pairs analysis tool.
#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional.
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--json` output on stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Regime-aware pairs-trading analysis for two correlated assets.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a pair from two bar files and print the trade decision.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// JSON bar file for the reference asset (e.g., BTCUSDT).
    #[arg(long)]
    reference: PathBuf,

    /// JSON bar file for the comparison asset (e.g., ETHUSDT).
    #[arg(long)]
    comparison: PathBuf,

    /// Path to the configuration file. Defaults apply if it does not exist.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Live price of the reference asset. Falls back to its last close.
    #[arg(long)]
    reference_price: Option<Decimal>,

    /// Live price of the comparison asset. Falls back to its last close.
    #[arg(long)]
    comparison_price: Option<Decimal>,

    /// Bar interval of both files (e.g., "1h", "4h"). Overrides `data.interval`.
    #[arg(long)]
    interval: Option<BarInterval>,

    /// Days of history to analyze. Overrides `data.lookback_days`.
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Re-run the analysis every N seconds until interrupted.
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,

    /// Print the decision as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Loads the configuration, then runs one cycle or a watch loop.
async fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    if let Some(interval) = args.interval {
        config.data.interval = interval;
    }
    if let Some(days) = args.lookback_days {
        config.data.lookback_days = days;
    }

    let analyzer = PairAnalyzer::new(&config)?;
    let prices = CurrentPrices {
        reference: args.reference_price,
        comparison: args.comparison_price,
    };

    let Some(secs) = args.watch else {
        return run_cycle(&analyzer, &config, &args, &prices).await;
    };

    tracing::info!(
        every_secs = secs,
        reference = %analyzer.symbols().reference,
        comparison = %analyzer.symbols().comparison,
        "Watching pair"
    );
    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed cycle produces no decision; the next tick tries again.
                match run_cycle(&analyzer, &config, &args, &prices).await {
                    Ok(()) => {}
                    Err(e) if is_insufficient_data(&e) => {
                        tracing::warn!("No decision this cycle: {e:#}");
                    }
                    Err(e) => tracing::error!("Analysis cycle failed: {e:#}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watch");
                return Ok(());
            }
        }
    }
}

/// One full refresh: load both series concurrently, trim to the lookback, analyze, print.
async fn run_cycle(
    analyzer: &PairAnalyzer,
    config: &AnalysisConfig,
    args: &AnalyzeArgs,
    prices: &CurrentPrices,
) -> Result<()> {
    let (reference, comparison) =
        tokio::try_join!(load_bars(&args.reference), load_bars(&args.comparison))?;

    let window = bars_for_lookback(config.data.lookback_days, config.data.interval);
    let reference = most_recent(reference, window);
    let comparison = most_recent(comparison, window);
    tracing::debug!(
        window,
        interval = %config.data.interval,
        reference_bars = reference.len(),
        comparison_bars = comparison.len(),
        "Applied lookback window"
    );

    let report = analyzer.analyze_configured(&reference, &comparison, prices)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.decision)?);
    } else {
        println!("{}", render_report(&report));
    }
    Ok(())
}

fn is_insufficient_data(err: &anyhow::Error) -> bool {
    err.downcast_ref::<EngineError>()
        .is_some_and(EngineError::is_insufficient_data)
}

/// Reads a JSON array of `{ "timestamp", "close" }` bars, ordered oldest first.
async fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read bar file {}", path.display()))?;
    let mut bars: Vec<Bar> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse bar file {}", path.display()))?;
    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

/// Keeps the last `count` bars.
fn most_recent(mut bars: Vec<Bar>, count: usize) -> Vec<Bar> {
    let skip = bars.len().saturating_sub(count);
    bars.split_off(skip)
}

fn render_report(report: &AnalysisReport) -> Table {
    let decision = &report.decision;
    let trend = &report.trend;
    let dominance = &report.dominance;
    let leg = |symbol: &Option<String>| symbol.clone().unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        (
            "Pair",
            format!("{} / {}", report.symbols.reference, report.symbols.comparison),
        ),
        ("Points", report.point_count.to_string()),
        (
            "Regime",
            format!("{} (strength {}%)", trend.regime, trend.strength_pct),
        ),
        (
            "Reference change",
            format!("{}% (momentum {:+})", trend.ref_change_pct, trend.momentum),
        ),
        (
            "Reference holds up in down-moves",
            format!(
                "{}% of {} samples",
                dominance.ref_dominance_rate, dominance.down_sample_count
            ),
        ),
        (
            "Comparison outperforms in up-moves",
            format!(
                "{}% of {} samples",
                dominance.cmp_outperform_rate, dominance.up_sample_count
            ),
        ),
        ("Strategy", decision.strategy.to_string()),
        ("Action", decision.action.to_string()),
        ("Long", leg(&decision.long_symbol)),
        ("Short", leg(&decision.short_symbol)),
        ("Confidence", format!("{}%", decision.confidence_pct)),
        (
            "Gap (current / mean / std)",
            format!(
                "{}% / {}% / {}%",
                decision.current_gap, decision.mean_gap, decision.std_dev_gap
            ),
        ),
        ("Expected move", format!("{}%", decision.expected_move_pct)),
        ("Risk", decision.risk_level.to_string()),
        ("Reasoning", decision.reasoning.clone()),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}
