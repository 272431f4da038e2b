use crate::error::EngineError;
use analytics::GapStats;
use analytics::stats::fixed_pct;
use configuration::{AnalysisConfig, DecisionParams};
use core_types::{
    Decision, DominanceResult, NormalizedPoint, PairLeg, PairSymbols, PriceSnapshot, TrendResult,
};
use risk::{GapRiskModel, RiskModel};
use std::sync::Arc;
use strategies::{DecisionContext, create_strategy};

/// Combines regime, dominance and the live spread into a `Decision`.
///
/// The engine holds only configuration. `decide` is pure: identical inputs always
/// produce an identical `Decision`.
pub struct DecisionEngine {
    params: DecisionParams,
    benchmark: PairLeg,
    risk_model: Arc<dyn RiskModel>,
}

impl DecisionEngine {
    pub fn new(params: DecisionParams, benchmark: PairLeg, risk_model: Arc<dyn RiskModel>) -> Self {
        Self {
            params,
            benchmark,
            risk_model,
        }
    }

    /// Builds an engine with the stock `GapRiskModel`.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, EngineError> {
        let risk_model = GapRiskModel::new(config.risk.clone())?;
        Ok(Self::new(
            config.decision.clone(),
            config.pair.benchmark,
            Arc::new(risk_model),
        ))
    }

    pub fn benchmark(&self) -> PairLeg {
        self.benchmark
    }

    /// Produces the trade decision for one analysis run.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` with fewer than `min_points` points or when either side of
    ///   the snapshot is missing. Callers must not treat this as a SKIP.
    /// * `MalformedInput` if the spread statistics overflow.
    /// * `Strategy` if the decision parameters are invalid.
    pub fn decide(
        &self,
        points: &[NormalizedPoint],
        trend: &TrendResult,
        dominance: &DominanceResult,
        snapshot: &PriceSnapshot,
        symbols: &PairSymbols,
    ) -> Result<Decision, EngineError> {
        if points.len() < self.params.min_points {
            return Err(EngineError::InsufficientData {
                stage: "decision engine",
                required: self.params.min_points,
                actual: points.len(),
            });
        }
        let Some(current_gap) = snapshot.current_gap() else {
            let present =
                usize::from(snapshot.reference.is_some()) + usize::from(snapshot.comparison.is_some());
            return Err(EngineError::InsufficientData {
                stage: "price snapshot",
                required: 2,
                actual: present,
            });
        };
        let stats = GapStats::from_points(points)?;

        let family = trend.regime.family();
        let strategy = create_strategy(family, &self.params)?;
        let ctx = DecisionContext {
            symbols,
            benchmark: self.benchmark,
            trend,
            dominance,
            current_gap,
            mean_gap: stats.mean,
            std_dev_gap: stats.std_dev,
        };
        let selection = strategy.select(&ctx);

        let expected_move = self
            .risk_model
            .expected_move(family, current_gap, stats.mean);
        let risk_level = self.risk_model.risk_level(stats.std_dev);

        let decision = Decision {
            strategy: strategy.kind(),
            action: selection.action,
            long_symbol: selection.legs.map(|l| symbols.symbol(l.long).to_string()),
            short_symbol: selection.legs.map(|l| symbols.symbol(l.short).to_string()),
            reasoning: selection.reasoning,
            confidence_pct: selection.confidence_pct,
            current_gap: fixed_pct(current_gap),
            mean_gap: fixed_pct(stats.mean),
            std_dev_gap: fixed_pct(stats.std_dev),
            expected_move_pct: fixed_pct(expected_move),
            risk_level,
        };

        tracing::info!(
            regime = %trend.regime,
            strategy = %decision.strategy,
            action = %decision.action,
            long = decision.long_symbol.as_deref().unwrap_or("-"),
            short = decision.short_symbol.as_deref().unwrap_or("-"),
            confidence = decision.confidence_pct,
            risk = %decision.risk_level,
            "Decision produced"
        );

        Ok(decision)
    }
}
