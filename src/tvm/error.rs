//! Error types for the formula library

use thiserror::Error;

/// Errors returned by the TVM formulas
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TvmError {
    /// Input outside the domain of the formula
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rate solver did not reach the residual tolerance
    #[error("rate calculation did not converge after {iterations} iterations")]
    ConvergenceError { iterations: usize },
}

impl TvmError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TvmError::InvalidArgument(message.into())
    }
}
