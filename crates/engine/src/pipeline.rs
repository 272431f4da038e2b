use crate::decision::DecisionEngine;
use crate::error::EngineError;
use analytics::{DominanceEstimator, TrendClassifier, normalize};
use configuration::AnalysisConfig;
use core_types::{
    Bar, CurrentPrices, Decision, DominanceResult, PairSymbols, PriceSnapshot, TrendResult,
};
use serde::Serialize;

/// Everything one analysis run produced, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbols: PairSymbols,
    pub point_count: usize,
    pub snapshot: PriceSnapshot,
    pub trend: TrendResult,
    pub dominance: DominanceResult,
    pub decision: Decision,
}

/// The full pipeline: normalize, classify, estimate, decide.
///
/// Holds configuration only. Each call to `analyze` recomputes every stage from the
/// bars it is given, so re-running it on a refresh cycle is idempotent.
pub struct PairAnalyzer {
    symbols: PairSymbols,
    trend: TrendClassifier,
    dominance: DominanceEstimator,
    decision: DecisionEngine,
}

impl PairAnalyzer {
    /// Validates `config` and builds every stage from it.
    pub fn new(config: &AnalysisConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            symbols: PairSymbols::new(
                config.pair.reference_symbol.clone(),
                config.pair.comparison_symbol.clone(),
            ),
            trend: TrendClassifier::new(config.trend.clone()),
            dominance: DominanceEstimator::new(config.dominance.clone()),
            decision: DecisionEngine::from_config(config)?,
        })
    }

    /// The pair named in the configuration.
    pub fn symbols(&self) -> &PairSymbols {
        &self.symbols
    }

    /// Runs the pipeline for the configured pair.
    pub fn analyze_configured(
        &self,
        reference: &[Bar],
        comparison: &[Bar],
        prices: &CurrentPrices,
    ) -> Result<AnalysisReport, EngineError> {
        self.analyze(reference, comparison, prices, &self.symbols)
    }

    /// Runs the pipeline on two already-fetched, chronological bar series.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` when either series is empty or the aligned history is
    ///   shorter than the decision engine's minimum. No decision exists for the cycle.
    /// * `MalformedInput` for non-positive anchor or live prices.
    pub fn analyze(
        &self,
        reference: &[Bar],
        comparison: &[Bar],
        prices: &CurrentPrices,
        symbols: &PairSymbols,
    ) -> Result<AnalysisReport, EngineError> {
        tracing::debug!(
            reference = %symbols.reference,
            comparison = %symbols.comparison,
            reference_bars = reference.len(),
            comparison_bars = comparison.len(),
            "Starting pair analysis"
        );

        let series = normalize(reference, comparison, prices)?;
        let trend = self.trend.classify(&series.points);
        let dominance = self.dominance.estimate(&series.points);
        let decision = self.decision.decide(
            &series.points,
            &trend,
            &dominance,
            &series.snapshot,
            symbols,
        )?;

        Ok(AnalysisReport {
            symbols: symbols.clone(),
            point_count: series.points.len(),
            snapshot: series.snapshot,
            trend,
            dominance,
            decision,
        })
    }
}
