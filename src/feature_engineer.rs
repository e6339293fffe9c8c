//! Feature engineering for fraud classifier inference.
//!
//! Builds the 29 training-time features from a raw transaction, in the
//! exact column order the exported classifier was fitted on.

use crate::types::transaction::{TransactionInput, TransactionType};
use anyhow::{bail, Result};
use chrono::{Local, Timelike};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 29;

/// Column names, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // Raw (6)
    "step",
    "amount",
    "oldbalanceOrg",
    "newbalanceOrig",
    "oldbalanceDest",
    "newbalanceDest",
    // Balance movements and ratios (4)
    "balance_diff_orig",
    "balance_diff_dest",
    "amount_to_oldbalance_orig_ratio",
    "amount_to_oldbalance_dest_ratio",
    // Indicators (7)
    "is_amount_rounded",
    "is_weekend",
    "orig_balance_consistent",
    "dest_balance_consistent",
    "orig_zero_balance",
    "dest_zero_balance",
    "transaction_hour",
    // One-hot type (5)
    "type_CASH_IN",
    "type_CASH_OUT",
    "type_DEBIT",
    "type_PAYMENT",
    "type_TRANSFER",
    // Account kinds and flows (7)
    "orig_is_customer",
    "dest_is_customer",
    "orig_is_merchant",
    "dest_is_merchant",
    "c_to_c",
    "c_to_m",
    "m_to_c",
];

/// Fixed-order model input
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value at a 1-based column position
    pub fn column(&self, position: usize) -> Option<f64> {
        position.checked_sub(1).and_then(|i| self.0.get(i).copied())
    }

    /// Value by training column name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }

    /// Single-precision copy for the ONNX input tensor
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

/// Current wall-clock hour, used in place of the dataset's `step` column.
pub fn current_step() -> u32 {
    Local::now().hour()
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

fn ratio(amount: f64, denominator: f64) -> Result<f64> {
    if denominator == 0.0 {
        bail!("division by zero");
    }
    Ok(amount / denominator)
}

/// Transforms transactions into model input features.
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// Engineer features using the current local hour as `step`.
    ///
    /// Identical bodies scored at different hours produce different vectors.
    pub fn engineer_now(&self, tx: &TransactionInput) -> Result<FeatureVector> {
        self.engineer(tx, current_step())
    }

    /// Engineer features for a given `step`.
    ///
    /// Zero and negative balances are used as-is; ratios divide by
    /// `balance + 1`, which still goes negative for negative balances.
    /// A balance of exactly -1 zeroes a denominator and fails, as does any
    /// feature that overflows to a non-finite value.
    pub fn engineer(&self, tx: &TransactionInput, step: u32) -> Result<FeatureVector> {
        let step = step as f64;
        let amount = tx.amount;
        let hour = step % 24.0;

        let balance_diff_orig = tx.old_balance_orig - tx.new_balance_orig;
        let balance_diff_dest = tx.new_balance_dest - tx.old_balance_dest;

        let amount_to_oldbalance_orig_ratio = ratio(amount, tx.old_balance_orig + 1.0)?;
        let amount_to_oldbalance_dest_ratio = ratio(amount, tx.old_balance_dest + 1.0)?;

        let is_amount_rounded = flag(amount % 1000.0 == 0.0);
        // Evening indicator despite the column name
        let is_weekend = flag(hour >= 18.0);
        let orig_balance_consistent = flag(balance_diff_orig == amount);
        let dest_balance_consistent = flag(balance_diff_dest == amount);
        let orig_zero_balance = flag(tx.old_balance_orig == 0.0);
        let dest_zero_balance = flag(tx.old_balance_dest == 0.0);

        let kind = tx.transaction_type;
        let is_payment = kind == TransactionType::Payment;

        // Originators are always customers; payments go to merchants.
        let orig_is_customer = 1.0;
        let dest_is_customer = flag(!is_payment);
        let orig_is_merchant = 0.0;
        let dest_is_merchant = flag(is_payment);

        let c_to_c = flag(orig_is_customer == 1.0 && dest_is_customer == 1.0);
        let c_to_m = flag(orig_is_customer == 1.0 && dest_is_merchant == 1.0);
        let m_to_c = 0.0;

        let features = FeatureVector([
            step,
            amount,
            tx.old_balance_orig,
            tx.new_balance_orig,
            tx.old_balance_dest,
            tx.new_balance_dest,
            balance_diff_orig,
            balance_diff_dest,
            amount_to_oldbalance_orig_ratio,
            amount_to_oldbalance_dest_ratio,
            is_amount_rounded,
            is_weekend,
            orig_balance_consistent,
            dest_balance_consistent,
            orig_zero_balance,
            dest_zero_balance,
            hour,
            flag(kind == TransactionType::CashIn),
            flag(kind == TransactionType::CashOut),
            flag(kind == TransactionType::Debit),
            flag(is_payment),
            flag(kind == TransactionType::Transfer),
            orig_is_customer,
            dest_is_customer,
            orig_is_merchant,
            dest_is_merchant,
            c_to_c,
            c_to_m,
            m_to_c,
        ]);

        if let Some(i) = features.0.iter().position(|v| !v.is_finite()) {
            bail!("feature {} is not finite", FEATURE_NAMES[i]);
        }
        Ok(features)
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_example() -> TransactionInput {
        TransactionInput::new(5000.0, TransactionType::Transfer)
            .with_orig_balances(10000.0, 5000.0)
            .with_dest_balances(0.0, 5000.0)
    }

    #[test]
    fn test_feature_count() {
        let engineer = FeatureEngineer::new();
        let features = engineer.engineer(&transfer_example(), 10).unwrap();

        assert_eq!(features.as_slice().len(), engineer.feature_count());
        assert_eq!(engineer.feature_names().len(), 29);
        assert_eq!(features.to_f32_vec().len(), 29);
    }

    #[test]
    fn test_transfer_example() {
        let features = FeatureEngineer::new().engineer(&transfer_example(), 10).unwrap();

        assert_eq!(features.column(1), Some(10.0)); // step
        assert_eq!(features.column(2), Some(5000.0)); // amount
        assert_eq!(features.column(7), Some(5000.0)); // balance_diff_orig
        assert_eq!(features.column(8), Some(5000.0)); // balance_diff_dest
        assert_eq!(features.column(11), Some(1.0)); // is_amount_rounded
        assert_eq!(features.column(13), Some(1.0));
        assert_eq!(features.column(14), Some(1.0));
        assert_eq!(features.column(15), Some(0.0));
        assert_eq!(features.column(16), Some(1.0));
        assert_eq!(&features.as_slice()[17..22], &[0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ratios() {
        let features = FeatureEngineer::new().engineer(&transfer_example(), 0).unwrap();

        assert_eq!(features.get("amount_to_oldbalance_orig_ratio"), Some(5000.0 / 10001.0));
        assert_eq!(features.get("amount_to_oldbalance_dest_ratio"), Some(5000.0));
    }

    #[test]
    fn test_negative_balance_ratio_not_guarded() {
        let tx = TransactionInput::new(100.0, TransactionType::CashOut).with_orig_balances(-3.0, 0.0);
        let features = FeatureEngineer::new().engineer(&tx, 0).unwrap();

        assert_eq!(features.get("amount_to_oldbalance_orig_ratio"), Some(-50.0));
    }

    #[test]
    fn test_one_hot_sums_to_one() {
        let engineer = FeatureEngineer::new();
        for (i, kind) in TransactionType::ALL.into_iter().enumerate() {
            let features = engineer.engineer(&TransactionInput::new(1.0, kind), 3).unwrap();
            let one_hot = &features.as_slice()[17..22];

            assert_eq!(one_hot.iter().sum::<f64>(), 1.0);
            assert_eq!(one_hot[i], 1.0);
        }
    }

    #[test]
    fn test_rounded_amount_indicator() {
        let engineer = FeatureEngineer::new();
        for k in [-3_i64, 0, 1, 7, 250, 12_345] {
            let tx = TransactionInput::new(1000.0 * k as f64, TransactionType::Payment);
            assert_eq!(engineer.engineer(&tx, 0).unwrap().get("is_amount_rounded"), Some(1.0));
        }
        for amount in [999.0, 1000.5, 1.0, 2500.0] {
            let tx = TransactionInput::new(amount, TransactionType::Payment);
            assert_eq!(engineer.engineer(&tx, 0).unwrap().get("is_amount_rounded"), Some(0.0));
        }
    }

    #[test]
    fn test_evening_indicator() {
        let engineer = FeatureEngineer::new();
        let tx = transfer_example();

        assert_eq!(engineer.engineer(&tx, 17).unwrap().get("is_weekend"), Some(0.0));
        assert_eq!(engineer.engineer(&tx, 18).unwrap().get("is_weekend"), Some(1.0));
        assert_eq!(engineer.engineer(&tx, 23).unwrap().get("is_weekend"), Some(1.0));
        assert_eq!(engineer.engineer(&tx, 0).unwrap().get("is_weekend"), Some(0.0));
        assert_eq!(engineer.engineer(&tx, 23).unwrap().get("transaction_hour"), Some(23.0));
    }

    #[test]
    fn test_customer_flows() {
        let engineer = FeatureEngineer::new();
        for kind in TransactionType::ALL {
            let features = engineer.engineer(&TransactionInput::new(10.0, kind), 5).unwrap();
            let is_payment = kind == TransactionType::Payment;

            assert_eq!(features.get("orig_is_customer"), Some(1.0));
            assert_eq!(features.get("orig_is_merchant"), Some(0.0));
            assert_eq!(features.get("c_to_m"), Some(flag(is_payment)));
            assert_eq!(features.get("c_to_c"), Some(flag(!is_payment)));
            assert_eq!(features.get("m_to_c"), Some(0.0));
            assert_eq!(
                features.get("c_to_c").unwrap() + features.get("c_to_m").unwrap(),
                1.0
            );
        }
    }

    #[test]
    fn test_consistency_requires_exact_match() {
        let tx = TransactionInput::new(100.0, TransactionType::CashOut)
            .with_orig_balances(500.0, 400.01)
            .with_dest_balances(0.0, 0.0);
        let features = FeatureEngineer::new().engineer(&tx, 0).unwrap();

        assert_eq!(features.get("orig_balance_consistent"), Some(0.0));
        assert_eq!(features.get("dest_balance_consistent"), Some(0.0));
        assert_eq!(features.get("dest_zero_balance"), Some(1.0));
    }

    #[test]
    fn test_current_step_in_range() {
        assert!(current_step() < 24);
    }

    #[test]
    fn test_engineer_now_uses_wall_clock_hour() {
        let before = current_step();
        let features = FeatureEngineer::new().engineer_now(&transfer_example()).unwrap();
        let after = current_step();

        let step = features.get("step").unwrap();
        assert!(step == before as f64 || step == after as f64);
        assert_eq!(features.get("transaction_hour"), Some(step));
    }

    #[test]
    fn test_minus_one_balance_is_division_by_zero() {
        let engineer = FeatureEngineer::new();

        let tx = TransactionInput::new(0.0, TransactionType::CashOut)
            .with_orig_balances(-1.0, 0.0)
            .with_dest_balances(-1.0, 0.0);
        let err = engineer.engineer(&tx, 4).unwrap_err();
        assert_eq!(err.to_string(), "division by zero");

        let tx = TransactionInput::new(250.0, TransactionType::Transfer).with_dest_balances(-1.0, 10.0);
        assert_eq!(engineer.engineer(&tx, 4).unwrap_err().to_string(), "division by zero");
    }

    #[test]
    fn test_overflowing_feature_rejected() {
        let tx = TransactionInput::new(1.0, TransactionType::Debit).with_orig_balances(f64::MAX, -f64::MAX);
        let err = FeatureEngineer::new().engineer(&tx, 0).unwrap_err();
        assert_eq!(err.to_string(), "feature balance_diff_orig is not finite");
    }

    #[test]
    fn test_other_negative_balances_pass_through() {
        let tx = TransactionInput::new(100.0, TransactionType::CashOut)
            .with_orig_balances(-2.0, 5.0)
            .with_dest_balances(-0.5, 0.0);
        let features = FeatureEngineer::new().engineer(&tx, 0).unwrap();

        assert_eq!(features.get("amount_to_oldbalance_orig_ratio"), Some(-100.0));
        assert_eq!(features.get("amount_to_oldbalance_dest_ratio"), Some(200.0));
    }
}
