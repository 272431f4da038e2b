use crate::error::RiskError;
use crate::RiskModel;
use configuration::RiskParams;
use core_types::{RegimeFamily, RiskLevel};
use rust_decimal::Decimal;

/// Tiers risk by the standard deviation of the historical spread and scales the
/// expected move by a per-regime factor.
#[derive(Debug, Clone)]
pub struct GapRiskModel {
    params: RiskParams,
}

impl GapRiskModel {
    /// Creates a new `GapRiskModel` with the given configuration parameters.
    pub fn new(params: RiskParams) -> Result<Self, RiskError> {
        if params.medium_std_dev < Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "medium_std_dev cannot be negative".to_string(),
            ));
        }
        if params.medium_std_dev >= params.high_std_dev {
            return Err(RiskError::InvalidParameters(
                "medium_std_dev must be below high_std_dev".to_string(),
            ));
        }
        let factors = [
            params.downtrend_move_factor,
            params.uptrend_move_factor,
            params.reversion_move_factor,
        ];
        if factors.iter().any(|f| *f < Decimal::ZERO) {
            return Err(RiskError::InvalidParameters(
                "move factors cannot be negative".to_string(),
            ));
        }
        Ok(Self { params })
    }
}

impl RiskModel for GapRiskModel {
    fn risk_level(&self, std_dev_gap: Decimal) -> RiskLevel {
        if std_dev_gap > self.params.high_std_dev {
            RiskLevel::High
        } else if std_dev_gap > self.params.medium_std_dev {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn expected_move(
        &self,
        family: RegimeFamily,
        current_gap: Decimal,
        mean_gap: Decimal,
    ) -> Decimal {
        let expected = match family {
            RegimeFamily::Down => current_gap.abs() * self.params.downtrend_move_factor,
            RegimeFamily::Up => current_gap.abs() * self.params.uptrend_move_factor,
            RegimeFamily::Neutral => (current_gap - mean_gap).abs() * self.params.reversion_move_factor,
        };
        tracing::debug!(?family, %current_gap, %mean_gap, %expected, "Expected move");
        expected
    }
}
