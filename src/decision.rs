//! Threshold decision over classifier probabilities

use crate::config::DetectionConfig;
use crate::error::ApiError;
use crate::feature_engineer::{FeatureEngineer, FeatureVector};
use crate::models::inference::FraudClassifier;
use crate::types::prediction::{PredictionLabel, PredictionResult, RiskLevel};
use crate::types::transaction::TransactionInput;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info};

/// Label and tier for one probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub probability: f64,
    pub label: PredictionLabel,
    pub risk_level: RiskLevel,
}

/// Scores transactions with the loaded classifier.
pub struct DecisionService {
    classifier: Option<Arc<dyn FraudClassifier>>,
    engineer: FeatureEngineer,
    detection: DetectionConfig,
}

impl DecisionService {
    pub fn new(classifier: Option<Arc<dyn FraudClassifier>>, detection: DetectionConfig) -> Self {
        Self {
            classifier,
            engineer: FeatureEngineer::new(),
            detection,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn model_type(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.model_type())
    }

    /// Fraud threshold in use
    pub fn threshold(&self) -> f64 {
        self.detection.threshold
    }

    /// Apply the fraud threshold and the tier boundaries independently.
    pub fn decide(&self, probability: f64) -> Decision {
        Decision {
            probability,
            label: PredictionLabel::from_probability(probability, self.detection.threshold),
            risk_level: RiskLevel::from_probability(probability, &self.detection.risk_levels),
        }
    }

    /// Score a validated transaction at the current hour
    pub fn predict(&self, tx: &TransactionInput) -> Result<PredictionResult, ApiError> {
        let classifier = self.classifier.as_ref().ok_or(ApiError::ModelNotLoaded)?;
        let features = self.engineer.engineer_now(tx).map_err(ApiError::Inference)?;
        self.score(classifier.as_ref(), tx, &features)
    }

    /// Score a validated transaction using `step` as the hour feature.
    pub fn predict_at_step(
        &self,
        tx: &TransactionInput,
        step: u32,
    ) -> Result<PredictionResult, ApiError> {
        let classifier = self.classifier.as_ref().ok_or(ApiError::ModelNotLoaded)?;
        let features = self.engineer.engineer(tx, step).map_err(ApiError::Inference)?;
        self.score(classifier.as_ref(), tx, &features)
    }

    fn score(
        &self,
        classifier: &dyn FraudClassifier,
        tx: &TransactionInput,
        features: &FeatureVector,
    ) -> Result<PredictionResult, ApiError> {
        debug!(features = ?features.as_slice(), "Features engineered");

        let probability = classifier
            .predict_proba(features)
            .map_err(ApiError::Inference)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(ApiError::Inference(anyhow::anyhow!(
                "classifier returned probability {} outside [0, 1]",
                probability
            )));
        }

        let decision = self.decide(probability);

        info!(
            transaction_type = %tx.transaction_type,
            amount = format!("{:.2}", tx.amount),
            fraud_probability = format!("{:.4}", probability),
            prediction = ?decision.label,
            risk_level = ?decision.risk_level,
            threshold = self.detection.threshold,
            "Transaction analyzed"
        );

        Ok(PredictionResult::new(
            tx,
            probability,
            decision.label,
            decision.risk_level,
            Local::now(),
        ))
    }
}
