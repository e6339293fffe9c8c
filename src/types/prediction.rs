//! Prediction outcome data structures

use crate::types::transaction::{TransactionInput, TransactionType};
use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Qualitative banding of the fraud probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Band a probability; independent of the fraud threshold.
    pub fn from_probability(probability: f64, thresholds: &RiskLevelThresholds) -> Self {
        if probability >= thresholds.high {
            RiskLevel::High
        } else if probability >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Lower bounds (inclusive) of the Medium and High tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            medium: 0.4,
            high: 0.7,
        }
    }
}

/// Binary outcome of the threshold decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionLabel {
    Fraud,
    Legitimate,
}

impl PredictionLabel {
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            PredictionLabel::Fraud
        } else {
            PredictionLabel::Legitimate
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, PredictionLabel::Fraud)
    }
}

/// Echo of the scored transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// The submitted number, integer or float as sent
    pub amount: Value,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Local time, ISO 8601 without offset; microseconds only when non-zero
    pub timestamp: String,
}

/// Response payload of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: PredictionLabel,

    /// Fraud probability rounded to 4 decimals
    pub confidence: f64,

    pub risk_level: RiskLevel,

    /// Unrounded fraud probability
    #[serde(skip)]
    pub fraud_probability: f64,

    /// `TXN_` followed by the local timestamp to the second
    pub transaction_id: String,

    pub details: TransactionDetails,
}

impl PredictionResult {
    pub fn new(
        transaction: &TransactionInput,
        probability: f64,
        prediction: PredictionLabel,
        risk_level: RiskLevel,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            prediction,
            confidence: round4(probability),
            risk_level,
            fraud_probability: probability,
            transaction_id: transaction_id(at),
            details: TransactionDetails {
                amount: transaction
                    .amount_literal
                    .clone()
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::from(transaction.amount)),
                transaction_type: transaction.transaction_type,
                timestamp: iso_timestamp(at),
            },
        }
    }
}

/// Timestamp-derived identifier; two requests in the same second share it.
pub fn transaction_id(at: DateTime<Local>) -> String {
    format!("TXN_{}", at.format("%Y%m%d%H%M%S"))
}

fn iso_timestamp(at: DateTime<Local>) -> String {
    let local = at.naive_local();
    if local.nanosecond() / 1_000 % 1_000_000 == 0 {
        local.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        local.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_risk_level_boundaries() {
        let thresholds = RiskLevelThresholds::default();

        assert_eq!(RiskLevel::from_probability(0.0, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3999, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.4, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.6999, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.7, &thresholds), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(1.0, &thresholds), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_monotonic() {
        let thresholds = RiskLevelThresholds::default();
        let mut previous = RiskLevel::Low;
        for step in 0..=1000 {
            let level = RiskLevel::from_probability(step as f64 / 1000.0, &thresholds);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_label_boundary() {
        assert_eq!(PredictionLabel::from_probability(0.1, 0.1), PredictionLabel::Fraud);
        assert_eq!(PredictionLabel::from_probability(0.0999999, 0.1), PredictionLabel::Legitimate);
    }

    #[test]
    fn test_result_serialization() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        let tx = TransactionInput::new(5000.0, TransactionType::Transfer);
        let result = PredictionResult::new(
            &tx,
            0.123456,
            PredictionLabel::Fraud,
            RiskLevel::Low,
            at,
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prediction"], "Fraud");
        assert_eq!(json["confidence"], 0.1235);
        assert_eq!(json["risk_level"], "Low");
        assert_eq!(json["transaction_id"], "TXN_20260307090502");
        assert_eq!(json["details"]["type"], "TRANSFER");
        assert_eq!(json["details"]["amount"], 5000.0);
        assert_eq!(json["details"]["timestamp"], "2026-03-07T09:05:02");
        assert!(json.get("fraud_probability").is_none());
        assert_eq!(result.fraud_probability, 0.123456);
    }

    #[test]
    fn test_timestamp_keeps_nonzero_microseconds() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        let tx = TransactionInput::new(1.0, TransactionType::Payment);

        let with_micros = at.with_nanosecond(1_500_000).unwrap();
        let result = PredictionResult::new(&tx, 0.5, PredictionLabel::Fraud, RiskLevel::Medium, with_micros);
        assert_eq!(result.details.timestamp, "2026-03-07T09:05:02.001500");

        let sub_micro = at.with_nanosecond(999).unwrap();
        let result = PredictionResult::new(&tx, 0.5, PredictionLabel::Fraud, RiskLevel::Medium, sub_micro);
        assert_eq!(result.details.timestamp, "2026-03-07T09:05:02");
    }

    #[test]
    fn test_amount_echoed_as_sent() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        let body = serde_json::json!({
            "amount": 5000,
            "type": "CASH_OUT",
            "oldbalanceOrg": 0,
            "newbalanceOrig": 0,
            "oldbalanceDest": 0,
            "newbalanceDest": 0
        });
        let tx = TransactionInput::from_json(&body).unwrap();
        let result = PredictionResult::new(&tx, 0.5, PredictionLabel::Fraud, RiskLevel::Medium, at);

        assert_eq!(serde_json::to_string(&result.details.amount).unwrap(), "5000");
    }
}
