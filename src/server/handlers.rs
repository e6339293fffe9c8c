//! API handlers

use crate::error::ApiError;
use crate::server::state::AppState;
use crate::types::prediction::PredictionResult;
use crate::types::transaction::TransactionInput;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub model_type: Option<String>,
    pub optimal_threshold: f64,
}

/// Health check endpoint; always 200
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.decision.is_model_loaded(),
        scaler_loaded: state.scaler_loaded,
        model_type: state.decision.model_type().map(str::to_string),
        optimal_threshold: state.decision.threshold(),
    })
}

/// Score a transaction
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, ApiError> {
    let start = Instant::now();

    match score(&state, &body).await {
        Ok(result) => {
            state.metrics.record_prediction(
                start.elapsed(),
                result.fraud_probability,
                result.prediction,
                result.risk_level,
            );
            Ok(Json(result))
        }
        Err(e) => {
            let client_error = e.status_code().is_client_error();
            if client_error {
                warn!(error = %e, "Rejected prediction request");
            } else {
                error!(error = %e, "Error during prediction");
            }
            state.metrics.record_error(client_error);
            Err(e)
        }
    }
}

async fn score(state: &AppState, body: &[u8]) -> Result<PredictionResult, ApiError> {
    if !state.decision.is_model_loaded() {
        return Err(ApiError::ModelNotLoaded);
    }

    let payload: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;
    let tx = TransactionInput::from_json(&payload)?;

    let decision = state.decision.clone();
    tokio::task::spawn_blocking(move || decision.predict(&tx))
        .await
        .map_err(|e| ApiError::Inference(anyhow::anyhow!("inference task aborted: {}", e)))?
}
