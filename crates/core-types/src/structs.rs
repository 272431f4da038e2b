use crate::enums::{PairLeg, Regime, RiskLevel, StrategyKind, TradeAction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single time-indexed price observation as delivered by the data source.
///
/// Only the close is used by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self { timestamp, close }
    }
}

/// One aligned pair of bars expressed as percent change from the first bar of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub timestamp: DateTime<Utc>,
    pub ref_change_pct: Decimal,
    pub cmp_change_pct: Decimal,
    /// Always `cmp_change_pct - ref_change_pct`.
    pub spread: Decimal,
}

impl NormalizedPoint {
    pub fn new(timestamp: DateTime<Utc>, ref_change_pct: Decimal, cmp_change_pct: Decimal) -> Self {
        Self {
            timestamp,
            ref_change_pct,
            cmp_change_pct,
            spread: cmp_change_pct - ref_change_pct,
        }
    }
}

/// Live prices supplied by the caller. A missing price falls back to the latest bar close.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentPrices {
    pub reference: Option<Decimal>,
    pub comparison: Option<Decimal>,
}

/// The live price of one asset and its total change over the analysed period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub current_price: Decimal,
    pub total_change_pct: Decimal,
}

/// Live state of both assets. An entry is `None` when the caller could not price that asset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub reference: Option<AssetSnapshot>,
    pub comparison: Option<AssetSnapshot>,
}

impl PriceSnapshot {
    /// The live spread (`comparison - reference` total change), if both sides are present.
    pub fn current_gap(&self) -> Option<Decimal> {
        match (self.reference, self.comparison) {
            (Some(reference), Some(comparison)) => {
                Some(comparison.total_change_pct - reference.total_change_pct)
            }
            _ => None,
        }
    }
}

/// The ticker symbols of the analysed pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSymbols {
    pub reference: String,
    pub comparison: String,
}

impl PairSymbols {
    pub fn new(reference: impl Into<String>, comparison: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            comparison: comparison.into(),
        }
    }

    pub fn symbol(&self, leg: PairLeg) -> &str {
        match leg {
            PairLeg::Reference => &self.reference,
            PairLeg::Comparison => &self.comparison,
        }
    }
}

/// The regime classification of the reference asset for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub regime: Regime,
    /// Integer percentage, 0..=100.
    pub strength_pct: u8,
    /// Reference change of the most recent point.
    pub ref_change_pct: Decimal,
    pub momentum: i32,
    pub recent_delta: Decimal,
}

impl TrendResult {
    /// The result reported when there is not enough history to classify.
    pub fn neutral() -> Self {
        Self {
            regime: Regime::Neutral,
            strength_pct: 0,
            ref_change_pct: Decimal::new(0, 2),
            momentum: 0,
            recent_delta: Decimal::new(0, 2),
        }
    }
}

/// Conditional outperformance statistics of the pair over its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominanceResult {
    /// How often the reference fell less than the comparison in down periods, 0..=100.
    pub ref_dominance_rate: Decimal,
    /// How often the comparison gained more than the reference in up periods, 0..=100.
    pub cmp_outperform_rate: Decimal,
    pub down_sample_count: usize,
    pub up_sample_count: usize,
    /// Sample-size proxy, 0..=90.
    pub confidence: u8,
    pub ref_dominates_in_downtrend: bool,
    pub cmp_outperforms_in_uptrend: bool,
}

/// The terminal artifact of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub strategy: StrategyKind,
    pub action: TradeAction,
    pub long_symbol: Option<String>,
    pub short_symbol: Option<String>,
    pub reasoning: String,
    pub confidence_pct: u8,
    pub current_gap: Decimal,
    pub mean_gap: Decimal,
    pub std_dev_gap: Decimal,
    pub expected_move_pct: Decimal,
    pub risk_level: RiskLevel,
}

impl Decision {
    pub fn is_actionable(&self) -> bool {
        self.action != TradeAction::Skip
    }
}
