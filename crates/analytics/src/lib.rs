//! # Pair Analytics
//!
//! Stateless calculators that turn two raw price series into the statistics the
//! decision layer consumes.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** Every calculator is recomputed from scratch on each call.
//!   No state survives between analysis runs.
//! - **Soft Degradation:** The trend classifier and the dominance estimator fall back to
//!   neutral defaults on short histories. Only the normalizer fails hard, because its
//!   failures point at broken upstream data.
//!
//! ## Public API
//!
//! - `normalize`: Series Normalizer, bars to `NormalizedPoint`s plus a `PriceSnapshot`.
//! - `TrendClassifier`: regime label and strength from recent reference momentum.
//! - `DominanceEstimator`: conditional outperformance rates over the history.
//! - `GapStats`: population mean and standard deviation of the spread.

// Declare the modules that constitute this crate.
pub mod dominance;
pub mod error;
pub mod normalizer;
pub mod stats;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use dominance::DominanceEstimator;
pub use error::AnalyticsError;
pub use normalizer::{NormalizedSeries, normalize};
pub use stats::GapStats;
pub use trend::{REGIME_RULES, RegimeRule, TrendClassifier, TrendSignal};
