//! ML model loading and inference components

pub mod inference;
pub mod loader;
pub mod scaler;

pub use inference::{FraudClassifier, OnnxClassifier};
pub use loader::{LoadedArtifacts, ModelLoader};
pub use scaler::FeatureScaler;
