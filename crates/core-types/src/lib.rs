pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{PairLeg, Regime, RegimeFamily, RiskLevel, StrategyKind, TradeAction};
pub use error::CoreError;
pub use structs::{
    AssetSnapshot, Bar, CurrentPrices, Decision, DominanceResult, NormalizedPoint, PairSymbols, PriceSnapshot,
    TrendResult,
};
