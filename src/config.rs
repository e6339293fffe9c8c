//! Configuration management for the fraud detection API

use crate::types::prediction::RiskLevelThresholds;
use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Threshold that maximizes net savings on the validation set
pub const OPTIMAL_THRESHOLD: f64 = 0.1;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub detection: DetectionConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    /// Overridden by the `PORT` environment variable
    pub port: u16,
}

/// Classifier artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// ONNX export of the trained classifier
    pub model_path: String,
    /// Feature scaler parameters (JSON)
    pub scaler_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Decision configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Fraud probability at or above which a transaction is labeled fraud
    pub threshold: f64,
    /// Risk tier boundaries
    #[serde(default)]
    pub risk_levels: RiskLevelThresholds,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: OPTIMAL_THRESHOLD,
            risk_levels: RiskLevelThresholds::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

/// Periodic metrics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between summaries; 0 disables the reporter
    pub report_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from `FRAUD_API_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("FRAUD_API_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration layered as defaults, file, `FRAUD_API__*` env, then `PORT`.
    ///
    /// A missing file is not an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to serialize default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUD_API")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are probabilities and tiers are ordered
    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        ensure!(
            (0.0..=1.0).contains(&detection.threshold),
            "detection.threshold must be within [0, 1], got {}",
            detection.threshold
        );
        ensure!(
            (0.0..=1.0).contains(&detection.risk_levels.medium)
                && (0.0..=1.0).contains(&detection.risk_levels.high),
            "detection.risk_levels must be within [0, 1]"
        );
        ensure!(
            detection.risk_levels.medium <= detection.risk_levels.high,
            "detection.risk_levels.medium ({}) must not exceed high ({})",
            detection.risk_levels.medium,
            detection.risk_levels.high
        );
        Ok(())
    }

    /// Listening address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            models: ModelsConfig {
                model_path: "model/fraud_detection_model.onnx".to_string(),
                scaler_path: "model/feature_scaler.json".to_string(),
                onnx_threads: 1,
            },
            detection: DetectionConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 300,
            },
        }
    }
}
