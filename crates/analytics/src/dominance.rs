use crate::stats::fixed_pct;
use configuration::DominanceParams;
use core_types::{DominanceResult, NormalizedPoint};
use rust_decimal::Decimal;

/// Measures how each asset has historically behaved relative to the other
/// during down-moves and up-moves of the reference asset.
///
/// Each sample compares `lookback`-period momentum ending at index `i` with the
/// sample starting at `i - lookback`. Consecutive samples overlap by
/// `lookback - 1` points.
#[derive(Debug, Clone)]
pub struct DominanceEstimator {
    params: DominanceParams,
}

#[derive(Debug, Default)]
struct Tally {
    down_samples: usize,
    ref_wins_in_down: usize,
    up_samples: usize,
    cmp_wins_in_up: usize,
}

impl DominanceEstimator {
    pub fn new(params: DominanceParams) -> Self {
        Self { params }
    }

    /// Computes the conditional outperformance rates over the full history.
    ///
    /// Histories shorter than `min_points` yield `neutral_prior()`.
    pub fn estimate(&self, points: &[NormalizedPoint]) -> DominanceResult {
        let params = &self.params;
        if points.len() < params.min_points || points.len() <= params.lookback {
            tracing::warn!(
                points = points.len(),
                required = params.min_points,
                "Too few points to estimate dominance, using neutral prior"
            );
            return self.neutral_prior();
        }

        let threshold = params.move_threshold;
        let mut tally = Tally::default();

        for i in params.lookback..points.len() {
            let ref_delta = points[i].ref_change_pct - points[i - params.lookback].ref_change_pct;
            let cmp_delta = points[i].cmp_change_pct - points[i - params.lookback].cmp_change_pct;

            if ref_delta < -threshold {
                tally.down_samples += 1;
                // The reference fell less than the comparison.
                if ref_delta > cmp_delta {
                    tally.ref_wins_in_down += 1;
                }
            } else if ref_delta > threshold {
                tally.up_samples += 1;
                if cmp_delta > ref_delta {
                    tally.cmp_wins_in_up += 1;
                }
            }
        }

        let ref_dominance_rate = rate(tally.ref_wins_in_down, tally.down_samples);
        let cmp_outperform_rate = rate(tally.cmp_wins_in_up, tally.up_samples);
        let samples = tally.down_samples + tally.up_samples;
        let confidence = (samples as u64)
            .saturating_mul(u64::from(params.confidence_per_sample))
            .min(u64::from(params.confidence_cap)) as u8;

        let result = DominanceResult {
            ref_dominance_rate,
            cmp_outperform_rate,
            down_sample_count: tally.down_samples,
            up_sample_count: tally.up_samples,
            confidence,
            ref_dominates_in_downtrend: ref_dominance_rate > params.favour_threshold,
            cmp_outperforms_in_uptrend: cmp_outperform_rate > params.favour_threshold,
        };

        tracing::debug!(
            ref_dominance_rate = %result.ref_dominance_rate,
            cmp_outperform_rate = %result.cmp_outperform_rate,
            down_samples = result.down_sample_count,
            up_samples = result.up_sample_count,
            confidence = result.confidence,
            "Dominance estimated"
        );

        result
    }

    /// The estimate used before enough history exists: even rates, the reference
    /// presumed to hold up better in down-moves, and no sample-based confidence.
    pub fn neutral_prior(&self) -> DominanceResult {
        DominanceResult {
            ref_dominance_rate: EVEN,
            cmp_outperform_rate: EVEN,
            down_sample_count: 0,
            up_sample_count: 0,
            confidence: self.params.neutral_confidence,
            ref_dominates_in_downtrend: true,
            cmp_outperforms_in_uptrend: false,
        }
    }
}

const EVEN: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);

/// `wins / samples` as a percentage, or an even 50 when there were no samples.
fn rate(wins: usize, samples: usize) -> Decimal {
    if samples == 0 {
        return EVEN;
    }
    fixed_pct(Decimal::from(wins) / Decimal::from(samples) * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn points(pairs: &[(Decimal, Decimal)]) -> Vec<NormalizedPoint> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, (r, c))| NormalizedPoint::new(start + Duration::hours(i as i64), *r, *c))
            .collect()
    }

    fn estimator() -> DominanceEstimator {
        DominanceEstimator::new(DominanceParams::default())
    }

    #[test]
    fn short_history_returns_neutral_prior() {
        let result = estimator().estimate(&points(&[(dec!(0), dec!(0)); 9]));
        assert_eq!(result.confidence, 50);
        assert_eq!(result.ref_dominance_rate, dec!(50));
        assert!(result.ref_dominates_in_downtrend);
        assert_eq!(result.down_sample_count + result.up_sample_count, 0);
    }

    #[test]
    fn reference_holding_up_in_selloff_dominates() {
        // Reference falls 0.5 per step, comparison falls 1 per step.
        let series: Vec<_> = (0..12)
            .map(|i| {
                let i = Decimal::from(i);
                (i * dec!(-0.5), i * dec!(-1))
            })
            .collect();

        let result = estimator().estimate(&points(&series));
        // Samples at i = 5..=11, each ref_delta = -2.5 against cmp_delta = -5.
        assert_eq!(result.down_sample_count, 7);
        assert_eq!(result.up_sample_count, 0);
        assert_eq!(result.ref_dominance_rate, dec!(100));
        assert_eq!(result.cmp_outperform_rate, dec!(50));
        assert_eq!(result.confidence, 21);
        assert!(result.ref_dominates_in_downtrend);
        assert!(!result.cmp_outperforms_in_uptrend);
    }

    #[test]
    fn comparison_outperforming_rally_is_counted() {
        let series: Vec<_> = (0..10)
            .map(|i| {
                let i = Decimal::from(i);
                (i * dec!(0.5), i * dec!(0.8))
            })
            .collect();

        let result = estimator().estimate(&points(&series));
        assert_eq!(result.up_sample_count, 5);
        assert_eq!(result.cmp_outperform_rate, dec!(100));
        assert!(result.cmp_outperforms_in_uptrend);
        // No down samples, so the down rate is even and does not favour the reference.
        assert_eq!(result.ref_dominance_rate, dec!(50));
        assert!(!result.ref_dominates_in_downtrend);
    }

    #[test]
    fn dead_zone_moves_are_ignored() {
        // Five-step reference moves of exactly 1% are inside the dead zone.
        let series: Vec<_> = (0..15)
            .map(|i| {
                let i = Decimal::from(i);
                (i * dec!(0.2), i * dec!(-3))
            })
            .collect();

        let result = estimator().estimate(&points(&series));
        assert_eq!(result.down_sample_count, 0);
        assert_eq!(result.up_sample_count, 0);
        assert_eq!(result.confidence, 0);
    }

    #[test]
    fn mixed_outcomes_round_to_two_places() {
        // Down samples where the reference wins once and loses twice.
        let series = points(&[
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(-2), dec!(-3)),
            (dec!(-2), dec!(-1)),
            (dec!(-2), dec!(-1)),
            (dec!(-2), dec!(-2)),
            (dec!(-2), dec!(-2)),
        ]);

        let result = estimator().estimate(&series);
        // i = 8 and 9 are ties (ref_delta == cmp_delta) and count as losses.
        assert_eq!(result.down_sample_count, 5);
        assert_eq!(result.ref_dominance_rate, dec!(20));

        let series = points(&[
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(0)),
            (dec!(-2), dec!(-3)),
            (dec!(-2), dec!(-1)),
            (dec!(-2), dec!(-1)),
        ]);
        let result = estimator().estimate(&series);
        assert_eq!(result.down_sample_count, 3);
        assert_eq!(result.ref_dominance_rate, dec!(33.33));
    }

    #[test]
    fn confidence_is_capped() {
        let series: Vec<_> = (0..60)
            .map(|i| {
                let i = Decimal::from(i);
                (i * dec!(-1), i * dec!(-2))
            })
            .collect();

        let result = estimator().estimate(&points(&series));
        assert_eq!(result.down_sample_count, 55);
        assert_eq!(result.confidence, 90);
    }
}
