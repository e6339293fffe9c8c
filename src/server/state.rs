//! Application state

use crate::config::AppConfig;
use crate::decision::DecisionService;
use crate::metrics::PredictionMetrics;
use crate::models::loader::LoadedArtifacts;
use std::sync::Arc;

/// Shared, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub decision: Arc<DecisionService>,
    pub scaler_loaded: bool,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn new(artifacts: LoadedArtifacts, config: &AppConfig) -> Self {
        Self {
            decision: Arc::new(DecisionService::new(
                artifacts.classifier,
                config.detection.clone(),
            )),
            scaler_loaded: artifacts.scaler.is_some(),
            metrics: Arc::new(PredictionMetrics::new()),
        }
    }
}
