//! Error taxonomy for the clock core.

use thiserror::Error;

/// Errors surfaced by the clock core
///
/// Every recoverable error leaves the state it was raised from untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Unknown theme preset, unknown arc key or malformed settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Rejected input value (countdown duration, viewport)
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation has nothing to act on in the current state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<serde_json::Error> for ClockError {
    fn from(err: serde_json::Error) -> Self {
        ClockError::Configuration(err.to_string())
    }
}

pub type Result<T, E = ClockError> = std::result::Result<T, E>;
