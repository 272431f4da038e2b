use crate::{DecisionContext, LegSelection, Legs, PairStrategy};
use analytics::stats::{fixed_pct, whole_pct};
use configuration::DecisionParams;
use core_types::{PairLeg, StrategyKind};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Down,
    Up,
}

/// Rides the current regime using the pair's historical behaviour in that regime.
///
/// In down-moves it prefers being long the benchmark; in up-moves it prefers being
/// long the other asset. Dominance statistics only raise confidence when the
/// benchmark is the reference asset, since that is the side they are measured on.
#[derive(Debug, Clone)]
pub struct TrendFollowing {
    params: DecisionParams,
    direction: Direction,
}

impl TrendFollowing {
    pub fn downtrend(params: DecisionParams) -> Self {
        Self {
            params,
            direction: Direction::Down,
        }
    }

    pub fn uptrend(params: DecisionParams) -> Self {
        Self {
            params,
            direction: Direction::Up,
        }
    }

    /// `base + rate * rate_weight + strength * strength_weight`, capped.
    fn weighted_confidence(&self, rate: Decimal, strength_pct: u8) -> u8 {
        let p = &self.params;
        let raw = p.confidence_base
            + rate * p.rate_weight
            + Decimal::from(strength_pct) * p.strength_weight;
        whole_pct(raw, p.confidence_cap)
    }

    fn select_down(&self, ctx: &DecisionContext<'_>) -> LegSelection {
        let trend = ctx.trend;
        let dominance = ctx.dominance;
        let benchmark = ctx.symbols.symbol(ctx.benchmark);

        if ctx.benchmark == PairLeg::Reference && dominance.ref_dominates_in_downtrend {
            let legs = Legs::long(PairLeg::Reference);
            let confidence = self.weighted_confidence(dominance.ref_dominance_rate, trend.strength_pct);
            let reasoning = format!(
                "{} at {}% strength. {} held up better than {} in {}% of {} past down-moves: long {}, short {}.",
                trend.regime,
                trend.strength_pct,
                ctx.symbols.reference,
                ctx.symbols.comparison,
                fixed_pct(dominance.ref_dominance_rate),
                dominance.down_sample_count,
                ctx.symbols.symbol(legs.long),
                ctx.symbols.symbol(legs.short),
            );
            return LegSelection::trade(legs, confidence, reasoning);
        }

        let legs = Legs::long(ctx.benchmark);
        let reasoning = format!(
            "{} at {}% strength. History does not confirm a dominant leg, so {} is held as the safe haven: long {}, short {}.",
            trend.regime,
            trend.strength_pct,
            benchmark,
            ctx.symbols.symbol(legs.long),
            ctx.symbols.symbol(legs.short),
        );
        LegSelection::trade(legs, self.params.fallback_confidence, reasoning)
    }

    fn select_up(&self, ctx: &DecisionContext<'_>) -> LegSelection {
        let trend = ctx.trend;
        let dominance = ctx.dominance;

        if ctx.benchmark == PairLeg::Reference && dominance.cmp_outperforms_in_uptrend {
            let legs = Legs::long(PairLeg::Comparison);
            let confidence = self.weighted_confidence(dominance.cmp_outperform_rate, trend.strength_pct);
            let reasoning = format!(
                "{} at {}% strength. {} outgained {} in {}% of {} past up-moves: long {}, short {}.",
                trend.regime,
                trend.strength_pct,
                ctx.symbols.comparison,
                ctx.symbols.reference,
                fixed_pct(dominance.cmp_outperform_rate),
                dominance.up_sample_count,
                ctx.symbols.symbol(legs.long),
                ctx.symbols.symbol(legs.short),
            );
            return LegSelection::trade(legs, confidence, reasoning);
        }

        let legs = Legs::long(ctx.benchmark.opposite());
        let reasoning = format!(
            "{} at {}% strength. Favouring the higher-beta leg over benchmark {}: long {}, short {}.",
            trend.regime,
            trend.strength_pct,
            ctx.symbols.symbol(ctx.benchmark),
            ctx.symbols.symbol(legs.long),
            ctx.symbols.symbol(legs.short),
        );
        LegSelection::trade(legs, self.params.fallback_confidence, reasoning)
    }
}

impl PairStrategy for TrendFollowing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TrendFollowing
    }

    fn select(&self, ctx: &DecisionContext<'_>) -> LegSelection {
        let selection = match self.direction {
            Direction::Down => self.select_down(ctx),
            Direction::Up => self.select_up(ctx),
        };
        tracing::debug!(
            direction = ?self.direction,
            legs = ?selection.legs,
            confidence = selection.confidence_pct,
            "TrendFollowing selection"
        );
        selection
    }
}
