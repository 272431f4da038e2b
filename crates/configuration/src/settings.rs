use crate::error::ConfigError;
use crate::timeframe::BarInterval;
use core_types::PairLeg;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the analysis pipeline.
///
/// Every section falls back to its `Default` when omitted, so an empty
/// `config.toml` (or none at all) reproduces the stock thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub pair: PairConfig,
    pub data: DataParams,
    pub trend: TrendParams,
    pub dominance: DominanceParams,
    pub decision: DecisionParams,
    pub risk: RiskParams,
}

/// The analysed pair and which of its legs acts as the trend-defining benchmark.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PairConfig {
    pub reference_symbol: String,
    pub comparison_symbol: String,
    /// The asset treated as the market leader / safe haven.
    pub benchmark: PairLeg,
}

/// How much history the caller hands to the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataParams {
    pub interval: BarInterval,
    pub lookback_days: u32,
}

/// Thresholds and weights for the regime classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Number of trailing reference changes inspected for momentum.
    pub window: usize,
    /// Below this many points the classifier reports a neutral default.
    pub min_points: usize,
    pub strong_change_threshold: Decimal,
    pub change_threshold: Decimal,
    pub strong_momentum: i32,
    pub strong_change_weight: Decimal,
    pub strong_momentum_weight: Decimal,
    pub strong_strength_cap: u8,
    pub change_weight: Decimal,
    pub momentum_weight: Decimal,
    pub strength_cap: u8,
    pub neutral_strength: u8,
}

/// Parameters for the historical dominance estimator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DominanceParams {
    /// Distance, in points, of the momentum comparison.
    pub lookback: usize,
    pub min_points: usize,
    /// Reference moves within +/- this many percent are ignored.
    pub move_threshold: Decimal,
    /// A rate strictly above this favours the leg it measures.
    pub favour_threshold: Decimal,
    pub confidence_per_sample: u32,
    pub confidence_cap: u8,
    pub neutral_confidence: u8,
}

/// Weights for selecting legs and scoring confidence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    pub min_points: usize,
    pub confidence_base: Decimal,
    pub rate_weight: Decimal,
    pub strength_weight: Decimal,
    pub confidence_cap: u8,
    /// Confidence used when dominance does not back the trend trade.
    pub fallback_confidence: u8,
    /// Half-width of the no-trade band around the mean gap, in standard deviations.
    pub reversion_band_sigma: Decimal,
    pub reversion_confidence: u8,
}

/// Risk tiers and expected-move factors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    pub high_std_dev: Decimal,
    pub medium_std_dev: Decimal,
    pub downtrend_move_factor: Decimal,
    pub uptrend_move_factor: Decimal,
    pub reversion_move_factor: Decimal,
}

// --- Default Implementations ---

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            reference_symbol: "BTCUSDT".to_string(),
            comparison_symbol: "ETHUSDT".to_string(),
            benchmark: PairLeg::Reference,
        }
    }
}

impl Default for DataParams {
    fn default() -> Self {
        Self {
            interval: BarInterval::OneHour,
            lookback_days: 7,
        }
    }
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            window: 5,
            min_points: 5,
            strong_change_threshold: dec!(3),
            change_threshold: dec!(1),
            strong_momentum: 2,
            strong_change_weight: dec!(10),
            strong_momentum_weight: dec!(15),
            strong_strength_cap: 100,
            change_weight: dec!(8),
            momentum_weight: dec!(10),
            strength_cap: 80,
            neutral_strength: 30,
        }
    }
}

impl Default for DominanceParams {
    fn default() -> Self {
        Self {
            lookback: 5,
            min_points: 10,
            move_threshold: dec!(1),
            favour_threshold: dec!(50),
            confidence_per_sample: 3,
            confidence_cap: 90,
            neutral_confidence: 50,
        }
    }
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            min_points: 10,
            confidence_base: dec!(50),
            rate_weight: dec!(0.3),
            strength_weight: dec!(0.2),
            confidence_cap: 85,
            fallback_confidence: 60,
            reversion_band_sigma: dec!(0.5),
            reversion_confidence: 55,
        }
    }
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            high_std_dev: dec!(3),
            medium_std_dev: dec!(1.5),
            downtrend_move_factor: dec!(0.3),
            uptrend_move_factor: dec!(0.25),
            reversion_move_factor: dec!(0.5),
        }
    }
}

// --- Validation ---

impl AnalysisConfig {
    /// Rejects combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair.reference_symbol.trim().is_empty()
            || self.pair.comparison_symbol.trim().is_empty()
        {
            return Err(invalid("pair symbols cannot be empty"));
        }
        if self.pair.reference_symbol == self.pair.comparison_symbol {
            return Err(invalid("reference and comparison symbols must differ"));
        }
        if self.data.lookback_days == 0 {
            return Err(invalid("data.lookback_days must be at least 1"));
        }
        self.trend.validate()?;
        self.dominance.validate()?;
        self.decision.validate()?;
        self.risk.validate()
    }
}

impl TrendParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(invalid("trend.window must be at least 2"));
        }
        if self.min_points < self.window {
            return Err(invalid("trend.min_points must be at least trend.window"));
        }
        if self.change_threshold > self.strong_change_threshold {
            return Err(invalid(
                "trend.change_threshold cannot exceed trend.strong_change_threshold",
            ));
        }
        if self.strong_strength_cap > 100 || self.strength_cap > 100 || self.neutral_strength > 100 {
            return Err(invalid("trend strength values are percentages (0-100)"));
        }
        Ok(())
    }
}

impl DominanceParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(invalid("dominance.lookback must be at least 1"));
        }
        if self.min_points <= self.lookback {
            return Err(invalid("dominance.min_points must exceed dominance.lookback"));
        }
        if self.move_threshold < Decimal::ZERO {
            return Err(invalid("dominance.move_threshold cannot be negative"));
        }
        if self.confidence_cap > 100 || self.neutral_confidence > 100 {
            return Err(invalid("dominance confidence values are percentages (0-100)"));
        }
        Ok(())
    }
}

impl DecisionParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_points == 0 {
            return Err(invalid("decision.min_points must be at least 1"));
        }
        if self.reversion_band_sigma < Decimal::ZERO {
            return Err(invalid("decision.reversion_band_sigma cannot be negative"));
        }
        if self.confidence_cap > 100
            || self.fallback_confidence > 100
            || self.reversion_confidence > 100
        {
            return Err(invalid("decision confidence values are percentages (0-100)"));
        }
        Ok(())
    }
}

impl RiskParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.medium_std_dev >= self.high_std_dev {
            return Err(invalid("risk.medium_std_dev must be below risk.high_std_dev"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_trend_window_larger_than_min_points() {
        let mut config = AnalysisConfig::default();
        config.trend.window = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_dominance_min_points_not_above_lookback() {
        let mut config = AnalysisConfig::default();
        config.dominance.min_points = config.dominance.lookback;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_risk_tiers() {
        let mut config = AnalysisConfig::default();
        config.risk.medium_std_dev = dec!(4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_identical_symbols() {
        let mut config = AnalysisConfig::default();
        config.pair.comparison_symbol = config.pair.reference_symbol.clone();
        assert!(config.validate().is_err());
    }
}
