//! Type definitions for the fraud detection API

pub mod prediction;
pub mod transaction;

pub use prediction::{PredictionLabel, PredictionResult, RiskLevel, RiskLevelThresholds};
pub use transaction::{TransactionInput, TransactionType};
