use crate::error::AnalyticsError;
use core_types::NormalizedPoint;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a percentage to the two decimal places every reported figure uses.
pub fn round_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `round_pct`, padded so the value always renders with exactly two decimals
/// (`2` becomes `2.00`). Used for figures handed to the presentation layer.
pub fn fixed_pct(value: Decimal) -> Decimal {
    let mut fixed = round_pct(value);
    fixed.rescale(2);
    fixed
}

/// Percent change of `value` relative to `anchor`, rounded to 2 decimal places.
///
/// Returns `None` for a zero anchor or when the change does not fit in a `Decimal`.
pub fn pct_change(anchor: Decimal, value: Decimal) -> Option<Decimal> {
    let change = value
        .checked_sub(anchor)?
        .checked_div(anchor)?
        .checked_mul(HUNDRED)?;
    Some(round_pct(change))
}

/// Rounds to a whole percentage and clamps into `0..=cap`.
pub fn whole_pct(value: Decimal, cap: u8) -> u8 {
    let rounded = value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::from(cap));
    rounded.to_u8().unwrap_or(cap)
}

/// Population statistics of the spread series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapStats {
    pub mean: Decimal,
    pub std_dev: Decimal,
}

impl GapStats {
    /// Computes the population mean and standard deviation of `spread` over all points.
    pub fn from_points(points: &[NormalizedPoint]) -> Result<Self, AnalyticsError> {
        let spreads: Vec<Decimal> = points.iter().map(|p| p.spread).collect();
        Self::from_values(&spreads)
    }

    /// # Errors
    ///
    /// * `InsufficientData` for an empty slice.
    /// * `MalformedInput` when the sums overflow a `Decimal`.
    pub fn from_values(values: &[Decimal]) -> Result<Self, AnalyticsError> {
        if values.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                stage: "gap statistics",
                required: 1,
                actual: 0,
            });
        }
        let overflow = || AnalyticsError::MalformedInput("spread statistics overflow".to_string());
        let count = Decimal::from(values.len());

        let total = values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or_else(overflow)?;
        let mean = total.checked_div(count).ok_or_else(overflow)?;

        let squares = values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| {
                let diff = v.checked_sub(mean)?;
                acc.checked_add(diff.checked_mul(diff)?)
            })
            .ok_or_else(overflow)?;
        let variance = squares.checked_div(count).ok_or_else(overflow)?;
        let std_dev = variance.sqrt().ok_or_else(overflow)?;

        Ok(Self { mean, std_dev })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pct_change_rounds_half_away_from_zero() {
        // A 0.005% move sits exactly on the midpoint.
        assert_eq!(pct_change(dec!(200), dec!(200.01)), Some(dec!(0.01)));
        assert_eq!(pct_change(dec!(200), dec!(199.99)), Some(dec!(-0.01)));
        assert_eq!(pct_change(dec!(3), dec!(4)), Some(dec!(33.33)));
    }

    #[test]
    fn pct_change_of_anchor_is_zero() {
        assert_eq!(pct_change(dec!(42000), dec!(42000)), Some(Decimal::ZERO));
    }

    #[test]
    fn whole_pct_clamps_both_ends() {
        assert_eq!(whole_pct(dec!(94.5), 100), 95);
        assert_eq!(whole_pct(dec!(130), 100), 100);
        assert_eq!(whole_pct(dec!(-4), 80), 0);
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        assert!(
            (actual - expected).abs() < dec!(0.000001),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn gap_stats_population_formula() {
        let stats = GapStats::from_values(&[dec!(-1), dec!(1), dec!(-1), dec!(1)]).unwrap();
        assert_eq!(stats.mean, Decimal::ZERO);
        assert_close(stats.std_dev, Decimal::ONE);

        let values = [dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];
        let stats = GapStats::from_values(&values).unwrap();
        assert_eq!(stats.mean, dec!(5));
        assert_close(stats.std_dev, dec!(2));
    }

    #[test]
    fn gap_stats_of_constant_series_has_zero_spread() {
        let stats = GapStats::from_values(&[dec!(1.25); 6]).unwrap();
        assert_eq!(stats.mean, dec!(1.25));
        assert_eq!(stats.std_dev, Decimal::ZERO);
        assert!(matches!(
            GapStats::from_values(&[]),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn pct_change_reports_overflow_instead_of_panicking() {
        let dust = Decimal::new(1, 28);
        assert_eq!(pct_change(dust, dec!(100)), None);
        assert_eq!(pct_change(Decimal::ZERO, dec!(100)), None);
    }

    #[test]
    fn fixed_pct_always_has_two_decimals() {
        assert_eq!(fixed_pct(dec!(2)).to_string(), "2.00");
        assert_eq!(fixed_pct(Decimal::ZERO).to_string(), "0.00");
        assert_eq!(fixed_pct(dec!(1.0)).to_string(), "1.00");
        assert_eq!(fixed_pct(dec!(1.005)).to_string(), "1.01");
        assert_eq!(fixed_pct(dec!(-0.375)).to_string(), "-0.38");
    }

    #[test]
    fn gap_stats_overflow_is_malformed_input() {
        let huge = [Decimal::MAX, Decimal::MAX];
        assert!(matches!(
            GapStats::from_values(&huge),
            Err(AnalyticsError::MalformedInput(_))
        ));
    }
}
