use crate::error::StrategyError;
use crate::mean_reversion::MeanReversion;
use crate::trend_following::TrendFollowing;
use crate::PairStrategy;
use configuration::DecisionParams;
use core_types::RegimeFamily;
use rust_decimal::Decimal;

/// Creates the strategy responsible for a regime family.
///
/// Down and up regimes are traded with the trend; a neutral regime is traded
/// against the spread. The match is exhaustive, so a new family cannot be added
/// without deciding how it is traded.
pub fn create_strategy(
    family: RegimeFamily,
    params: &DecisionParams,
) -> Result<Box<dyn PairStrategy>, StrategyError> {
    validate(params)?;

    let params = params.clone();
    Ok(match family {
        RegimeFamily::Down => Box::new(TrendFollowing::downtrend(params)),
        RegimeFamily::Up => Box::new(TrendFollowing::uptrend(params)),
        RegimeFamily::Neutral => Box::new(MeanReversion::new(params)),
    })
}

fn validate(params: &DecisionParams) -> Result<(), StrategyError> {
    if params.confidence_cap > 100 {
        return Err(StrategyError::InvalidParameters(
            "confidence_cap must be a percentage (0-100)".to_string(),
        ));
    }
    if params.reversion_band_sigma < Decimal::ZERO {
        return Err(StrategyError::InvalidParameters(
            "reversion_band_sigma cannot be negative".to_string(),
        ));
    }
    Ok(())
}
