//! # Pair Strategy Library
//!
//! This crate turns the analytics of one run into a leg selection: which asset to
//! go long, which to short, and how confident to be. It defines a `PairStrategy`
//! trait and one implementation per regime family.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data sources
//!   or presentation. It depends only on `core-types`, `analytics` and `configuration`.
//! - **Regime Agnostic Engine:** The decision engine asks the `factory` for the strategy
//!   matching the current regime family and never branches on regimes itself.
//!
//! ## Public API
//!
//! - `PairStrategy`: The trait all strategies implement.
//! - `DecisionContext`: Everything a strategy may look at.
//! - `LegSelection` / `Legs`: A strategy's output.
//! - `create_strategy`: The factory function mapping a regime family to a strategy.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod factory;
pub mod mean_reversion;
pub mod trend_following;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use factory::create_strategy;
pub use mean_reversion::MeanReversion;
pub use trend_following::TrendFollowing;

use core_types::{DominanceResult, PairLeg, PairSymbols, StrategyKind, TradeAction, TrendResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything a strategy is allowed to see when choosing legs.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub symbols: &'a PairSymbols,
    /// The asset treated as trend-defining market leader.
    pub benchmark: PairLeg,
    pub trend: &'a TrendResult,
    pub dominance: &'a DominanceResult,
    pub current_gap: Decimal,
    pub mean_gap: Decimal,
    pub std_dev_gap: Decimal,
}

/// A long leg and the opposite short leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legs {
    pub long: PairLeg,
    pub short: PairLeg,
}

impl Legs {
    /// Goes long `leg` and short the other asset.
    pub fn long(leg: PairLeg) -> Self {
        Self {
            long: leg,
            short: leg.opposite(),
        }
    }
}

/// What a strategy decided. `legs` is `None` exactly when `action` is `Skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSelection {
    pub action: TradeAction,
    pub legs: Option<Legs>,
    pub confidence_pct: u8,
    pub reasoning: String,
}

impl LegSelection {
    pub fn trade(legs: Legs, confidence_pct: u8, reasoning: String) -> Self {
        Self {
            action: TradeAction::PairsTrade,
            legs: Some(legs),
            confidence_pct,
            reasoning,
        }
    }

    pub fn skip(reasoning: String) -> Self {
        Self {
            action: TradeAction::Skip,
            legs: None,
            confidence_pct: 0,
            reasoning,
        }
    }
}

/// The core trait that all pair strategies must implement.
///
/// Strategies are pure: `select` takes `&self`, performs no I/O, and returns the
/// same selection for the same context. The `Send + Sync` bounds let one strategy
/// instance be shared by concurrent analysis runs.
pub trait PairStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Chooses the legs and confidence for the given context.
    fn select(&self, ctx: &DecisionContext<'_>) -> LegSelection;
}
