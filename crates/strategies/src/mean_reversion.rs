use crate::{DecisionContext, LegSelection, Legs, PairStrategy};
use analytics::stats::fixed_pct;
use configuration::DecisionParams;
use core_types::{PairLeg, StrategyKind};

/// Bets on the live spread returning to its historical mean when no trend is present.
///
/// Trades only when the live gap sits outside `mean +/- band * std_dev`.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    params: DecisionParams,
}

impl MeanReversion {
    pub fn new(params: DecisionParams) -> Self {
        Self { params }
    }
}

impl PairStrategy for MeanReversion {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MeanReversion
    }

    fn select(&self, ctx: &DecisionContext<'_>) -> LegSelection {
        let band = self.params.reversion_band_sigma * ctx.std_dev_gap;
        let upper = ctx.mean_gap + band;
        let lower = ctx.mean_gap - band;
        let symbols = ctx.symbols;

        tracing::debug!(
            current_gap = %ctx.current_gap,
            %lower,
            %upper,
            "MeanReversion band"
        );

        if ctx.current_gap > upper {
            // The comparison asset has run ahead; expect the gap to narrow.
            let legs = Legs::long(PairLeg::Reference);
            let reasoning = format!(
                "{} with gap {}% above its mean of {}% (+{} sigma band {}%). Expect the gap to narrow: long {}, short {}.",
                ctx.trend.regime,
                fixed_pct(ctx.current_gap),
                fixed_pct(ctx.mean_gap),
                self.params.reversion_band_sigma,
                fixed_pct(upper),
                symbols.symbol(legs.long),
                symbols.symbol(legs.short),
            );
            return LegSelection::trade(legs, self.params.reversion_confidence, reasoning);
        }

        if ctx.current_gap < lower {
            // The comparison asset has lagged; expect the gap to widen back.
            let legs = Legs::long(PairLeg::Comparison);
            let reasoning = format!(
                "{} with gap {}% below its mean of {}% (-{} sigma band {}%). Expect the gap to widen: long {}, short {}.",
                ctx.trend.regime,
                fixed_pct(ctx.current_gap),
                fixed_pct(ctx.mean_gap),
                self.params.reversion_band_sigma,
                fixed_pct(lower),
                symbols.symbol(legs.long),
                symbols.symbol(legs.short),
            );
            return LegSelection::trade(legs, self.params.reversion_confidence, reasoning);
        }

        LegSelection::skip(format!(
            "{} with gap {}% inside the band {}% to {}% around its mean. No edge, skipping.",
            ctx.trend.regime,
            fixed_pct(ctx.current_gap),
            fixed_pct(lower),
            fixed_pct(upper),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DominanceResult, PairSymbols, Regime, TradeAction, TrendResult};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn run(current_gap: Decimal, mean_gap: Decimal, std_dev_gap: Decimal) -> LegSelection {
        let symbols = PairSymbols::new("BTCUSDT", "ETHUSDT");
        let trend = TrendResult {
            strength_pct: 30,
            ..TrendResult::neutral()
        };
        let dominance = DominanceResult {
            ref_dominance_rate: dec!(50),
            cmp_outperform_rate: dec!(50),
            down_sample_count: 0,
            up_sample_count: 0,
            confidence: 50,
            ref_dominates_in_downtrend: true,
            cmp_outperforms_in_uptrend: false,
        };
        let ctx = DecisionContext {
            symbols: &symbols,
            benchmark: PairLeg::Reference,
            trend: &trend,
            dominance: &dominance,
            current_gap,
            mean_gap,
            std_dev_gap,
        };
        MeanReversion::new(DecisionParams::default()).select(&ctx)
    }

    #[test]
    fn wide_gap_longs_reference() {
        let selection = run(dec!(2), dec!(0), dec!(1));
        assert_eq!(selection.action, TradeAction::PairsTrade);
        assert_eq!(selection.legs, Some(Legs::long(PairLeg::Reference)));
        assert_eq!(selection.confidence_pct, 55);
        assert!(selection.reasoning.contains("narrow"));
    }

    #[test]
    fn narrow_gap_longs_comparison() {
        let selection = run(dec!(-0.8), dec!(0), dec!(1));
        assert_eq!(selection.legs, Some(Legs::long(PairLeg::Comparison)));
        assert_eq!(selection.confidence_pct, 55);
    }

    #[test]
    fn gap_inside_band_skips() {
        let selection = run(dec!(0.1), dec!(0), dec!(1));
        assert_eq!(selection.action, TradeAction::Skip);
        assert_eq!(selection.legs, None);
        assert_eq!(selection.confidence_pct, 0);
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(run(dec!(0.5), dec!(0), dec!(1)).action, TradeAction::Skip);
        assert_eq!(run(dec!(-0.5), dec!(0), dec!(1)).action, TradeAction::Skip);
    }

    #[test]
    fn zero_volatility_trades_any_deviation() {
        let selection = run(dec!(1.01), dec!(1), Decimal::ZERO);
        assert_eq!(selection.legs, Some(Legs::long(PairLeg::Reference)));
        assert_eq!(run(dec!(1), dec!(1), Decimal::ZERO).action, TradeAction::Skip);
    }

    #[test]
    fn band_is_centred_on_mean() {
        // Mean of 3 moves the band to 2.5..3.5.
        assert_eq!(run(dec!(2), dec!(3), dec!(1)).legs, Some(Legs::long(PairLeg::Comparison)));
        assert_eq!(run(dec!(3.2), dec!(3), dec!(1)).action, TradeAction::Skip);
    }
}
