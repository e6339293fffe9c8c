//! Feature scaler parameters exported next to the classifier.
//!
//! The classifier was fitted on unscaled features, so the scaler is loaded
//! and reported but never applied before inference.

use crate::feature_engineer::FEATURE_COUNT;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-column standardization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {}", path.display()))?;
        let scaler: FeatureScaler = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler {}", path.display()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.mean.len() == FEATURE_COUNT && self.scale.len() == FEATURE_COUNT,
            "scaler expects {} columns, found mean={} scale={}",
            FEATURE_COUNT,
            self.mean.len(),
            self.scale.len()
        );
        Ok(())
    }

    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }
}
