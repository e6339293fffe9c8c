//! Request-level error taxonomy for the prediction API

use crate::types::transaction::TransactionType;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API callers as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The classifier artifact failed to load at startup
    #[error("Model not loaded. Please check server logs.")]
    ModelNotLoaded,

    /// Body was not a JSON object
    #[error("Request body must be a JSON object")]
    InvalidBody,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but not numeric
    #[error("Invalid value for field {0}: expected a number")]
    InvalidField(&'static str),

    #[error("Invalid transaction type. Must be one of: {}", TransactionType::valid_names())]
    InvalidTransactionType,

    /// Anything that went wrong between feature engineering and the classifier output
    #[error("Prediction failed: {0:#}")]
    Inference(anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelNotLoaded | ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody
            | ApiError::MissingField(_)
            | ApiError::InvalidField(_)
            | ApiError::InvalidTransactionType => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::ModelNotLoaded.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::MissingField("amount").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidTransactionType.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Inference(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiError::MissingField("oldbalanceDest").to_string(),
            "Missing required field: oldbalanceDest"
        );
        assert_eq!(
            ApiError::InvalidTransactionType.to_string(),
            "Invalid transaction type. Must be one of: CASH_IN, CASH_OUT, DEBIT, PAYMENT, TRANSFER"
        );
        assert_eq!(
            ApiError::Inference(anyhow::anyhow!("tensor shape mismatch")).to_string(),
            "Prediction failed: tensor shape mismatch"
        );
    }
}
