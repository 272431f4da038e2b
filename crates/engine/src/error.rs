use analytics::AnalyticsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No decision is available this cycle. Distinct from a SKIP decision.
    #[error("Insufficient data for {stage}: need at least {required}, got {actual}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Risk management error: {0}")]
    Risk(#[from] risk::RiskError),
}

impl EngineError {
    /// True when the cycle should simply be retried once more data exists.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, EngineError::InsufficientData { .. })
    }
}

impl From<AnalyticsError> for EngineError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InsufficientData {
                stage,
                required,
                actual,
            } => EngineError::InsufficientData {
                stage,
                required,
                actual,
            },
            AnalyticsError::MalformedInput(message) => EngineError::MalformedInput(message),
        }
    }
}

impl From<configuration::error::ConfigError> for EngineError {
    fn from(err: configuration::error::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}
