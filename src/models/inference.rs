//! Classifier inference

use crate::feature_engineer::FeatureVector;
use anyhow::{anyhow, bail, Context, Result};
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A pre-trained binary classifier exposing the positive-class probability.
pub trait FraudClassifier: Send + Sync {
    /// Probability that the transaction is fraudulent, in [0, 1]
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;

    /// Human readable model kind, reported by the health endpoint
    fn model_type(&self) -> &str;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    /// Model name
    pub name: String,
    /// Session runs need exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    pub input_name: String,
    /// Output name for probabilities
    pub output_name: String,
}

impl OnnxClassifier {
    pub fn new(name: String, session: Session, input_name: String, output_name: String) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        }
    }

    /// Extract fraud probability from model output.
    /// Handles tensor outputs (XGBoost) and seq(map) outputs (sklearn forests with zipmap).
    fn extract_probability(&self, outputs: &ort::session::SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            if let Some(prob) = self.try_extract(output)? {
                return Ok(prob);
            }
        }

        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(prob) = self.try_extract(&output)? {
                debug!(model = %self.name, output = %name, prob = prob, "Extracted from fallback output");
                return Ok(prob);
            }
        }

        bail!("model {} produced no probability output", self.name)
    }

    fn try_extract(&self, output: &ort::value::DynValue) -> Result<Option<f64>> {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            let prob = fraud_prob_from_tensor(&dims, data)?;
            debug!(model = %self.name, prob = prob, "Extracted from tensor");
            return Ok(Some(prob));
        }

        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            return self.extract_from_sequence_map(output).map(Some);
        }

        Ok(None)
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        // Batch size is always 1
        let map_value = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            debug!(model = %self.name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }
        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow!("No probability found in map"))
    }
}

impl FraudClassifier for OnnxClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        use ort::value::Tensor;

        let data = features.to_f32_vec();
        let shape = vec![1_i64, data.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = lock_unpoisoned(&self.session);

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        self.extract_probability(&outputs)
    }

    fn model_type(&self) -> &str {
        &self.name
    }
}

/// A panic during an earlier run leaves the session itself usable.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pick the positive-class probability out of a `[batch, classes]` or `[classes]` tensor
fn fraud_prob_from_tensor(dims: &[i64], data: &[f32]) -> Result<f64> {
    let classes = match dims {
        [_, classes] | [classes] => *classes,
        _ => bail!("unexpected probability tensor shape {:?}", dims),
    };

    match (classes, data) {
        (n, [_, fraud, ..]) if n >= 2 => Ok(*fraud as f64),
        (1, [prob, ..]) => Ok(*prob as f64),
        _ => bail!("probability tensor {:?} has no fraud class", dims),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor() {
        assert_eq!(fraud_prob_from_tensor(&[1, 2], &[0.25, 0.75]).unwrap(), 0.75);
        assert_eq!(fraud_prob_from_tensor(&[2], &[0.9, 0.1]).unwrap(), 0.10000000149011612);
    }

    #[test]
    fn test_single_probability_tensor() {
        assert_eq!(fraud_prob_from_tensor(&[1, 1], &[0.5]).unwrap(), 0.5);
    }

    #[test]
    fn test_malformed_tensor() {
        assert!(fraud_prob_from_tensor(&[1, 2, 3], &[0.1; 6]).is_err());
        assert!(fraud_prob_from_tensor(&[1, 2], &[0.1]).is_err());
        assert!(fraud_prob_from_tensor(&[1, 0], &[]).is_err());
    }

    #[test]
    fn test_lock_survives_panicking_holder() {
        let shared = std::sync::Arc::new(Mutex::new(7_u32));

        let held = shared.clone();
        let outcome = std::thread::spawn(move || {
            let _guard = held.lock().unwrap();
            panic!("run aborted while holding the session");
        })
        .join();
        assert!(outcome.is_err());
        assert!(shared.is_poisoned());

        *lock_unpoisoned(&shared) += 1;
        assert_eq!(*lock_unpoisoned(&shared), 8);
    }
}
