//! Error types for the ballistics engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, BallisticsError>;

/// Errors returned by the engine
///
/// Every variant is a value the caller can branch on. Retrying a solve with
/// identical inputs reproduces the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BallisticsError {
    /// A rifle, ammunition, shot or atmosphere value is outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The zero solver exhausted its iteration budget
    #[error("Zero solve failed after {iterations} iterations (miss {miss_in:.4} in)")]
    ZeroSolveFailure { iterations: usize, miss_in: f64 },

    /// The requested distance lies beyond the last integrated sample
    #[error("Distance {requested:.1} {unit} is beyond the computed trajectory ({max_reached:.1} {unit})")]
    OutOfRangeDistance {
        requested: f64,
        max_reached: f64,
        unit: &'static str,
    },

    /// A shooter profile could not be read or parsed
    #[error("Profile error: {0}")]
    Profile(String),
}

impl BallisticsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BallisticsError::InvalidConfiguration(msg.into())
    }
}

impl From<serde_json::Error> for BallisticsError {
    fn from(e: serde_json::Error) -> Self {
        BallisticsError::Profile(e.to_string())
    }
}

impl From<std::io::Error> for BallisticsError {
    fn from(e: std::io::Error) -> Self {
        BallisticsError::Profile(e.to_string())
    }
}
