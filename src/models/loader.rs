//! Startup loading of the classifier and scaler artifacts

use crate::config::ModelsConfig;
use crate::models::inference::{FraudClassifier, OnnxClassifier};
use crate::models::scaler::FeatureScaler;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Artifacts held for the lifetime of the process.
///
/// Either may be absent when loading failed; the server still starts.
#[derive(Clone, Default)]
pub struct LoadedArtifacts {
    pub classifier: Option<Arc<dyn FraudClassifier>>,
    pub scaler: Option<FeatureScaler>,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx_model")
            .to_string();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(name, session, input_name, output_name))
    }

    /// Load classifier and scaler, logging and tolerating failures of either.
    pub fn load_artifacts(&self, config: &ModelsConfig) -> LoadedArtifacts {
        let classifier = match self.load_model(&config.model_path) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn FraudClassifier>),
            Err(e) => {
                error!(path = %config.model_path, error = %format!("{e:#}"), "Error loading model");
                None
            }
        };

        let scaler = match FeatureScaler::from_file(&config.scaler_path) {
            Ok(scaler) => {
                info!(path = %config.scaler_path, columns = scaler.feature_count(), "Feature scaler loaded");
                Some(scaler)
            }
            Err(e) => {
                error!(path = %config.scaler_path, error = %format!("{e:#}"), "Error loading scaler");
                None
            }
        };

        LoadedArtifacts { classifier, scaler }
    }
}

/// Load artifacts, treating a runtime initialization failure as "nothing loaded".
pub fn load_artifacts(config: &ModelsConfig) -> LoadedArtifacts {
    match ModelLoader::with_threads(config.onnx_threads) {
        Ok(loader) => loader.load_artifacts(config),
        Err(e) => {
            error!(error = %e, "Failed to initialize ONNX Runtime");
            LoadedArtifacts {
                classifier: None,
                scaler: FeatureScaler::from_file(&config.scaler_path).ok(),
            }
        }
    }
}
