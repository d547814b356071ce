//! Model Errors
//!
//! Failures the engine surfaces instead of producing NaN or infinite state.
//! None of them is retried: the current round is abandoned and the caller
//! decides whether the whole run aborts.

use thiserror::Error;

/// Errors raised by the bargaining model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BargainError {
    /// An agent field is zero, negative or not finite
    #[error("invalid agent state: {field} = {value} (must be strictly positive and finite)")]
    InvalidState { field: &'static str, value: f64 },

    /// Proportional allocation has nothing to be proportional to
    #[error("degenerate allocation: marginal utility sum {sum} is not positive")]
    DegenerateAllocation { sum: f64 },

    /// Unknown policy name or an unusable parameter combination
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BargainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        BargainError::Configuration(message.into())
    }
}
