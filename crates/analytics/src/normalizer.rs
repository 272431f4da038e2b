use crate::error::AnalyticsError;
use crate::stats::pct_change;
use core_types::{AssetSnapshot, Bar, CurrentPrices, NormalizedPoint, PriceSnapshot};
use rust_decimal::Decimal;

/// The output of the Series Normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    /// Chronological, index 0 anchored at zero change.
    pub points: Vec<NormalizedPoint>,
    pub snapshot: PriceSnapshot,
}

/// Converts two bar series into percent-change points anchored to their first bar.
///
/// The series are aligned by index and truncated to the shorter length. Timestamps are
/// taken from the reference series and are not reconciled against the comparison series.
///
/// Each side of the snapshot uses the caller's live price when given, otherwise the
/// close of that series' most recent bar.
///
/// # Errors
///
/// * `InsufficientData` if either series is empty.
/// * `MalformedInput` if an anchor close or a live price is zero or negative, or if a
///   move from the anchor is too large to represent (e.g. a dust-sized anchor close).
pub fn normalize(
    reference: &[Bar],
    comparison: &[Bar],
    prices: &CurrentPrices,
) -> Result<NormalizedSeries, AnalyticsError> {
    let (Some(ref_anchor), Some(cmp_anchor)) = (reference.first(), comparison.first()) else {
        return Err(AnalyticsError::InsufficientData {
            stage: "normalizer",
            required: 1,
            actual: reference.len().min(comparison.len()),
        });
    };
    ensure_positive("reference anchor close", ref_anchor.close)?;
    ensure_positive("comparison anchor close", cmp_anchor.close)?;

    let aligned = reference.len().min(comparison.len());
    if reference.len() != comparison.len() {
        tracing::debug!(
            reference_len = reference.len(),
            comparison_len = comparison.len(),
            aligned,
            "Bar series differ in length, truncating to the shorter one"
        );
    }

    let points = reference
        .iter()
        .zip(comparison.iter())
        .map(|(r, c)| {
            Ok(NormalizedPoint::new(
                r.timestamp,
                change("reference", ref_anchor.close, r.close)?,
                change("comparison", cmp_anchor.close, c.close)?,
            ))
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;

    let snapshot = PriceSnapshot {
        reference: Some(snapshot_for(
            "reference",
            ref_anchor.close,
            prices.reference,
            reference,
        )?),
        comparison: Some(snapshot_for(
            "comparison",
            cmp_anchor.close,
            prices.comparison,
            comparison,
        )?),
    };

    Ok(NormalizedSeries { points, snapshot })
}

fn snapshot_for(
    side: &str,
    anchor: Decimal,
    live_price: Option<Decimal>,
    bars: &[Bar],
) -> Result<AssetSnapshot, AnalyticsError> {
    // `bars` is non-empty here, the anchor came from it.
    let current_price = match live_price {
        Some(price) => price,
        None => bars.last().map(|b| b.close).unwrap_or(anchor),
    };
    ensure_positive(&format!("{side} current price"), current_price)?;

    Ok(AssetSnapshot {
        current_price,
        total_change_pct: change(side, anchor, current_price)?,
    })
}

/// Moves larger than this, in percent, are rejected as corrupt data.
const MAX_CHANGE_PCT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

fn change(side: &str, anchor: Decimal, value: Decimal) -> Result<Decimal, AnalyticsError> {
    pct_change(anchor, value)
        .filter(|pct| pct.abs() <= MAX_CHANGE_PCT)
        .ok_or_else(|| {
            AnalyticsError::MalformedInput(format!(
                "{side} move from {anchor} to {value} is out of range"
            ))
        })
}

fn ensure_positive(what: &str, value: Decimal) -> Result<(), AnalyticsError> {
    if value <= Decimal::ZERO {
        return Err(AnalyticsError::MalformedInput(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn bars(closes: &[Decimal]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| Bar::new(start + Duration::hours(i as i64), *close))
            .collect()
    }

    #[test]
    fn anchors_both_series_at_first_bar() {
        let reference = bars(&[dec!(100), dec!(102), dec!(99)]);
        let comparison = bars(&[dec!(50), dec!(49), dec!(52.5)]);

        let series = normalize(&reference, &comparison, &CurrentPrices::default()).unwrap();

        let refs: Vec<_> = series.points.iter().map(|p| p.ref_change_pct).collect();
        let cmps: Vec<_> = series.points.iter().map(|p| p.cmp_change_pct).collect();
        let spreads: Vec<_> = series.points.iter().map(|p| p.spread).collect();
        assert_eq!(refs, vec![dec!(0), dec!(2), dec!(-1)]);
        assert_eq!(cmps, vec![dec!(0), dec!(-2), dec!(5)]);
        assert_eq!(spreads, vec![dec!(0), dec!(-4), dec!(6)]);
    }

    #[test]
    fn truncates_to_shorter_series() {
        let reference = bars(&[dec!(10), dec!(11), dec!(12), dec!(13)]);
        let comparison = bars(&[dec!(20), dec!(21)]);

        let series = normalize(&reference, &comparison, &CurrentPrices::default()).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[1].timestamp, reference[1].timestamp);
    }

    #[test]
    fn snapshot_falls_back_to_latest_close() {
        let reference = bars(&[dec!(100), dec!(110)]);
        let comparison = bars(&[dec!(200), dec!(190)]);

        let series = normalize(&reference, &comparison, &CurrentPrices::default()).unwrap();
        let reference = series.snapshot.reference.unwrap();
        let comparison = series.snapshot.comparison.unwrap();
        assert_eq!(reference.current_price, dec!(110));
        assert_eq!(reference.total_change_pct, dec!(10));
        assert_eq!(comparison.total_change_pct, dec!(-5));
        assert_eq!(series.snapshot.current_gap(), Some(dec!(-15)));
    }

    #[test]
    fn snapshot_prefers_live_prices() {
        let reference = bars(&[dec!(100), dec!(110)]);
        let comparison = bars(&[dec!(200), dec!(190)]);
        let prices = CurrentPrices {
            reference: Some(dec!(103)),
            comparison: None,
        };

        let series = normalize(&reference, &comparison, &prices).unwrap();
        assert_eq!(series.snapshot.reference.unwrap().total_change_pct, dec!(3));
        assert_eq!(series.snapshot.comparison.unwrap().current_price, dec!(190));
    }

    #[test]
    fn empty_series_is_insufficient_data() {
        let reference = bars(&[dec!(100)]);
        let result = normalize(&reference, &[], &CurrentPrices::default());
        assert!(matches!(
            result,
            Err(AnalyticsError::InsufficientData { stage: "normalizer", .. })
        ));
    }

    #[test]
    fn zero_anchor_is_malformed() {
        let reference = bars(&[dec!(0), dec!(1)]);
        let comparison = bars(&[dec!(5), dec!(6)]);
        let result = normalize(&reference, &comparison, &CurrentPrices::default());
        assert!(matches!(result, Err(AnalyticsError::MalformedInput(_))));
    }

    #[test]
    fn non_positive_live_price_is_malformed() {
        let reference = bars(&[dec!(1), dec!(2)]);
        let comparison = bars(&[dec!(5), dec!(6)]);
        let prices = CurrentPrices {
            reference: None,
            comparison: Some(dec!(-3)),
        };
        let result = normalize(&reference, &comparison, &prices);
        assert!(matches!(result, Err(AnalyticsError::MalformedInput(_))));
    }

    #[test]
    fn dust_anchor_is_malformed_not_a_panic() {
        let reference = bars(&[Decimal::new(1, 28), dec!(100), dec!(101)]);
        let comparison = bars(&[dec!(5), dec!(6), dec!(7)]);
        let result = normalize(&reference, &comparison, &CurrentPrices::default());
        assert!(matches!(result, Err(AnalyticsError::MalformedInput(_))));

        // Representable, but beyond the accepted move size.
        let reference = bars(&[dec!(0.000001), dec!(100000000)]);
        let comparison = bars(&[dec!(5), dec!(6)]);
        let result = normalize(&reference, &comparison, &CurrentPrices::default());
        assert!(matches!(result, Err(AnalyticsError::MalformedInput(_))));
    }

    #[test]
    fn oversized_live_price_is_malformed() {
        let reference = bars(&[dec!(0.0001), dec!(0.0002)]);
        let comparison = bars(&[dec!(5), dec!(6)]);
        let prices = CurrentPrices {
            reference: Some(Decimal::MAX),
            comparison: None,
        };
        let result = normalize(&reference, &comparison, &prices);
        assert!(matches!(result, Err(AnalyticsError::MalformedInput(_))));
    }

    fn closes() -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec(1i64..10_000_000i64, 1..60)
            .prop_map(|raw| raw.into_iter().map(|v| Decimal::new(v, 2)).collect())
    }

    proptest! {
        /// The anchor point never moves, whatever the data.
        #[test]
        fn first_point_is_always_zero(ref_closes in closes(), cmp_closes in closes()) {
            let series = normalize(&bars(&ref_closes), &bars(&cmp_closes), &CurrentPrices::default()).unwrap();
            prop_assert_eq!(series.points[0].ref_change_pct, Decimal::ZERO);
            prop_assert_eq!(series.points[0].cmp_change_pct, Decimal::ZERO);
            prop_assert_eq!(series.points.len(), ref_closes.len().min(cmp_closes.len()));
        }

        /// The spread identity holds exactly at every index.
        #[test]
        fn spread_is_exact_difference(ref_closes in closes(), cmp_closes in closes()) {
            let series = normalize(&bars(&ref_closes), &bars(&cmp_closes), &CurrentPrices::default()).unwrap();
            for point in &series.points {
                prop_assert_eq!(point.spread, point.cmp_change_pct - point.ref_change_pct);
            }
        }
    }
}
