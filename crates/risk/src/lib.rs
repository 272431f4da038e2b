//! Risk tiering and move estimation for pair decisions.

pub mod error;
pub mod gap_model;

pub use error::RiskError;
pub use gap_model::GapRiskModel;

use core_types::{RegimeFamily, RiskLevel};
use rust_decimal::Decimal;

/// Turns spread statistics into the risk figures attached to a decision.
pub trait RiskModel: Send + Sync {
    /// Classifies how volatile the spread has been.
    fn risk_level(&self, std_dev_gap: Decimal) -> RiskLevel;

    /// Estimates the size of the relative move, in percent, the decision is betting on.
    fn expected_move(&self, family: RegimeFamily, current_gap: Decimal, mean_gap: Decimal)
    -> Decimal;
}
