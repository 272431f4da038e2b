use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod timeframe;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisConfig, DataParams, DecisionParams, DominanceParams, PairConfig, RiskParams,
    TrendParams,
};
pub use timeframe::{BarInterval, bars_for_lookback};

/// Prefix for environment overrides, e.g. `PAIRS__PAIR__BENCHMARK=comparison`.
pub const ENV_PREFIX: &str = "PAIRS";

/// Loads the analysis configuration.
///
/// Sources are layered in order: built-in defaults, the TOML file at `path`
/// (skipped if it does not exist), then `PAIRS__`-prefixed environment variables.
/// The merged result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `AnalysisConfig` struct
    let config = builder.try_deserialize::<AnalysisConfig>()?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        reference = %config.pair.reference_symbol,
        comparison = %config.pair.comparison_symbol,
        benchmark = ?config.pair.benchmark,
        "Loaded analysis configuration"
    );

    Ok(config)
}
