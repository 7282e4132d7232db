//! Boundary error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde_json::{json, Value};
use thiserror::Error;

use crate::tvm::TvmError;

/// Errors surfaced to API clients
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Input failed to parse; the formulas were never called
    #[error("{0}")]
    InvalidRequest(String),

    /// Discriminator did not name a known calculation
    #[error("Invalid calculation type")]
    UnknownCalculation(String),

    /// The formula library rejected the inputs or failed to converge
    #[error(transparent)]
    Calculation(#[from] TvmError),
}

impl ApiError {
    /// HTTP status for this error: input problems are 400, solver failures 500
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::UnknownCalculation(_) => 400,
            ApiError::Calculation(TvmError::InvalidArgument(_)) => 400,
            ApiError::Calculation(TvmError::ConvergenceError { .. }) => 500,
        }
    }

    /// JSON body sent to the client
    pub fn body(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    /// Log at a level matching who is at fault
    pub fn log(&self, route: &str) {
        if self.status_code() >= 500 {
            error!("{}: {}", route, self);
        } else {
            warn!("{}: rejected request: {}", route, self);
        }
    }
}

/// Reject NaN and infinite results; JSON has no encoding for them
pub(super) fn finite_result(label: &str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() {
        return Err(TvmError::invalid(format!("{} result is not a finite number", label)).into());
    }
    Ok(value)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidRequest("Invalid request".into()).status_code(), 400);
        assert_eq!(ApiError::UnknownCalculation("IRR".into()).status_code(), 400);
        assert_eq!(
            ApiError::Calculation(TvmError::InvalidArgument("n".into())).status_code(),
            400
        );
        assert_eq!(
            ApiError::Calculation(TvmError::ConvergenceError { iterations: 100 }).status_code(),
            500
        );
    }

    #[test]
    fn test_body_shape() {
        let err = ApiError::UnknownCalculation("IRR".into());
        assert_eq!(err.body(), json!({ "error": "Invalid calculation type" }));

        let err = ApiError::from(TvmError::ConvergenceError { iterations: 100 });
        assert_eq!(
            err.body(),
            json!({ "error": "rate calculation did not converge after 100 iterations" })
        );
    }
}
