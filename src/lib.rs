//! Fraud Detection API Library
//!
//! Scores payment transactions with a pre-trained classifier behind an
//! HTTP API, alongside a handful of informational pages.

pub mod config;
pub mod decision;
pub mod error;
pub mod feature_engineer;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use decision::DecisionService;
pub use error::ApiError;
pub use feature_engineer::{FeatureEngineer, FeatureVector};
pub use models::inference::{FraudClassifier, OnnxClassifier};
pub use types::{prediction::PredictionResult, transaction::TransactionInput};
