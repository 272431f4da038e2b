use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown {0} label: '{1}'")]
    UnknownLabel(&'static str, String),
}
