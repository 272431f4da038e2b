use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The discrete market-condition label derived from the reference asset's momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    StrongDowntrend,
    Downtrend,
    Neutral,
    Uptrend,
    StrongUptrend,
}

impl Regime {
    pub const ALL: [Regime; 5] = [
        Regime::StrongDowntrend,
        Regime::Downtrend,
        Regime::Neutral,
        Regime::Uptrend,
        Regime::StrongUptrend,
    ];

    /// Collapses strong and plain variants into the direction the strategies branch on.
    pub fn family(&self) -> RegimeFamily {
        match self {
            Regime::StrongDowntrend | Regime::Downtrend => RegimeFamily::Down,
            Regime::Neutral => RegimeFamily::Neutral,
            Regime::Uptrend | Regime::StrongUptrend => RegimeFamily::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::StrongDowntrend => "STRONG_DOWNTREND",
            Regime::Downtrend => "DOWNTREND",
            Regime::Neutral => "NEUTRAL",
            Regime::Uptrend => "UPTREND",
            Regime::StrongUptrend => "STRONG_UPTREND",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Regime::ALL
            .into_iter()
            .find(|regime| regime.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownLabel("regime", s.to_string()))
    }
}

/// The direction of a regime, ignoring its strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeFamily {
    Down,
    Neutral,
    Up,
}

/// Which of the two input assets a setting or a trade leg refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairLeg {
    Reference,
    Comparison,
}

impl PairLeg {
    /// Returns the other asset of the pair
    pub fn opposite(&self) -> Self {
        match self {
            PairLeg::Reference => PairLeg::Comparison,
            PairLeg::Comparison => PairLeg::Reference,
        }
    }
}

impl FromStr for PairLeg {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "ref" => Ok(PairLeg::Reference),
            "comparison" | "cmp" => Ok(PairLeg::Comparison),
            _ => Err(CoreError::UnknownLabel("pair leg", s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    TrendFollowing,
    MeanReversion,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::TrendFollowing => f.write_str("TREND_FOLLOWING"),
            StrategyKind::MeanReversion => f.write_str("MEAN_REVERSION"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    /// Long one asset and short the other.
    PairsTrade,
    /// No position this cycle. Carries no legs.
    Skip,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::PairsTrade => f.write_str("PAIRS_TRADE"),
            TradeAction::Skip => f.write_str("SKIP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("LOW"),
            RiskLevel::Medium => f.write_str("MEDIUM"),
            RiskLevel::High => f.write_str("HIGH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regime_family_groups_strength_variants() {
        assert_eq!(Regime::StrongDowntrend.family(), RegimeFamily::Down);
        assert_eq!(Regime::Downtrend.family(), RegimeFamily::Down);
        assert_eq!(Regime::Neutral.family(), RegimeFamily::Neutral);
        assert_eq!(Regime::Uptrend.family(), RegimeFamily::Up);
        assert_eq!(Regime::StrongUptrend.family(), RegimeFamily::Up);
    }

    #[test]
    fn regime_parses_its_own_label() {
        for regime in Regime::ALL {
            assert_eq!(regime.to_string().parse::<Regime>(), Ok(regime));
        }
        assert_eq!(
            "SIDEWAYS".parse::<Regime>(),
            Err(CoreError::UnknownLabel("regime", "SIDEWAYS".to_string()))
        );
    }

    #[test]
    fn regime_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Regime::StrongUptrend).unwrap();
        assert_eq!(json, "\"STRONG_UPTREND\"");
        let json = serde_json::to_string(&TradeAction::PairsTrade).unwrap();
        assert_eq!(json, "\"PAIRS_TRADE\"");
    }

    #[test]
    fn pair_leg_opposite_round_trips() {
        assert_eq!(PairLeg::Reference.opposite(), PairLeg::Comparison);
        assert_eq!(PairLeg::Comparison.opposite().opposite(), PairLeg::Comparison);
        assert_eq!("cmp".parse::<PairLeg>(), Ok(PairLeg::Comparison));
    }
}
