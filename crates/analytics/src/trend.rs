use crate::stats::{fixed_pct, whole_pct};
use configuration::TrendParams;
use core_types::{NormalizedPoint, Regime, TrendResult};
use rust_decimal::Decimal;

/// The inputs every regime rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendSignal {
    /// Reference change of the most recent point.
    pub latest_change: Decimal,
    /// Increases minus decreases between adjacent points of the window.
    pub momentum: i32,
}

/// One row of the regime table: a predicate and the strength formula used when it matches.
pub struct RegimeRule {
    pub regime: Regime,
    pub matches: fn(&TrendSignal, &TrendParams) -> bool,
    /// Raw strength before rounding. Clamped to the rule's cap by `strength`.
    pub strength: fn(&TrendSignal, &TrendParams) -> Decimal,
    pub cap: fn(&TrendParams) -> u8,
}

/// The regime table, evaluated top to bottom. The first matching row wins, so the
/// order is the tie-break contract between overlapping conditions.
pub const REGIME_RULES: [RegimeRule; 5] = [
    RegimeRule {
        regime: Regime::StrongDowntrend,
        matches: is_strong_downtrend,
        strength: strong_magnitude,
        cap: strong_cap,
    },
    RegimeRule {
        regime: Regime::Downtrend,
        matches: is_downtrend,
        strength: magnitude,
        cap: plain_cap,
    },
    RegimeRule {
        regime: Regime::StrongUptrend,
        matches: is_strong_uptrend,
        strength: strong_signed,
        cap: strong_cap,
    },
    RegimeRule {
        regime: Regime::Uptrend,
        matches: is_uptrend,
        strength: signed,
        cap: plain_cap,
    },
    RegimeRule {
        regime: Regime::Neutral,
        matches: always,
        strength: neutral_strength,
        cap: neutral_cap,
    },
];

fn is_strong_downtrend(s: &TrendSignal, p: &TrendParams) -> bool {
    s.latest_change < -p.strong_change_threshold
        || (s.latest_change < Decimal::ZERO && s.momentum <= -p.strong_momentum)
}

fn is_downtrend(s: &TrendSignal, p: &TrendParams) -> bool {
    s.latest_change < -p.change_threshold || s.momentum < 0
}

fn is_strong_uptrend(s: &TrendSignal, p: &TrendParams) -> bool {
    s.latest_change > p.strong_change_threshold
        || (s.latest_change > Decimal::ZERO && s.momentum >= p.strong_momentum)
}

fn is_uptrend(s: &TrendSignal, p: &TrendParams) -> bool {
    s.latest_change > p.change_threshold || s.momentum > 0
}

fn always(_: &TrendSignal, _: &TrendParams) -> bool {
    true
}

fn strong_magnitude(s: &TrendSignal, p: &TrendParams) -> Decimal {
    s.latest_change.abs() * p.strong_change_weight
        + Decimal::from(s.momentum.abs()) * p.strong_momentum_weight
}

fn magnitude(s: &TrendSignal, p: &TrendParams) -> Decimal {
    s.latest_change.abs() * p.change_weight + Decimal::from(s.momentum.abs()) * p.momentum_weight
}

fn strong_signed(s: &TrendSignal, p: &TrendParams) -> Decimal {
    s.latest_change * p.strong_change_weight + Decimal::from(s.momentum) * p.strong_momentum_weight
}

fn signed(s: &TrendSignal, p: &TrendParams) -> Decimal {
    s.latest_change * p.change_weight + Decimal::from(s.momentum) * p.momentum_weight
}

fn neutral_strength(_: &TrendSignal, p: &TrendParams) -> Decimal {
    Decimal::from(p.neutral_strength)
}

fn strong_cap(p: &TrendParams) -> u8 {
    p.strong_strength_cap
}

fn plain_cap(p: &TrendParams) -> u8 {
    p.strength_cap
}

fn neutral_cap(_: &TrendParams) -> u8 {
    100
}

/// Derives the market regime from the reference asset's recent trajectory.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    params: TrendParams,
}

impl TrendClassifier {
    pub fn new(params: TrendParams) -> Self {
        Self { params }
    }

    /// Classifies the regime of the most recent `window` points.
    ///
    /// With fewer than `min_points` points this returns `TrendResult::neutral()`
    /// instead of failing.
    pub fn classify(&self, points: &[NormalizedPoint]) -> TrendResult {
        let params = &self.params;
        if points.len() < params.min_points || points.len() < params.window {
            tracing::warn!(
                points = points.len(),
                required = params.min_points,
                "Too few points to classify trend, reporting NEUTRAL"
            );
            return TrendResult::neutral();
        }

        let window: Vec<Decimal> = points[points.len() - params.window..]
            .iter()
            .map(|p| p.ref_change_pct)
            .collect();
        let latest_change = window[window.len() - 1];
        let recent_delta = latest_change - window[0];
        let momentum = momentum(&window);

        let signal = TrendSignal {
            latest_change,
            momentum,
        };
        let (regime, strength_pct) = self.evaluate(&signal);

        tracing::debug!(
            %regime,
            strength_pct,
            %latest_change,
            momentum,
            %recent_delta,
            "Trend classified"
        );

        TrendResult {
            regime,
            strength_pct,
            ref_change_pct: fixed_pct(latest_change),
            momentum,
            recent_delta: fixed_pct(recent_delta),
        }
    }

    /// Runs the regime table against a signal and returns the first match with its strength.
    pub fn evaluate(&self, signal: &TrendSignal) -> (Regime, u8) {
        let params = &self.params;
        REGIME_RULES
            .iter()
            .find(|rule| (rule.matches)(signal, params))
            .map(|rule| {
                let strength = whole_pct((rule.strength)(signal, params), (rule.cap)(params));
                (rule.regime, strength)
            })
            // The last row always matches.
            .unwrap_or((Regime::Neutral, params.neutral_strength))
    }
}

/// Adjacent increases minus adjacent decreases. Flat steps count for neither.
fn momentum(window: &[Decimal]) -> i32 {
    window
        .windows(2)
        .map(|pair| match pair[1].cmp(&pair[0]) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
        })
        .sum()
}
