//! Transaction payloads accepted by the prediction endpoint

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// Payment channel of a transaction, one-hot encoded in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    CashIn,
    CashOut,
    Debit,
    Payment,
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        TransactionType::CashIn,
        TransactionType::CashOut,
        TransactionType::Debit,
        TransactionType::Payment,
        TransactionType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CashIn => "CASH_IN",
            TransactionType::CashOut => "CASH_OUT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Comma separated list of accepted wire names
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(TransactionType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ApiError::InvalidTransactionType)
    }
}

/// Raw transaction as submitted by a caller.
///
/// Balances may be zero or negative; only presence and numeric-ness are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount: f64,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    #[serde(rename = "oldbalanceOrg")]
    pub old_balance_orig: f64,

    #[serde(rename = "newbalanceOrig")]
    pub new_balance_orig: f64,

    #[serde(rename = "oldbalanceDest")]
    pub old_balance_dest: f64,

    #[serde(rename = "newbalanceDest")]
    pub new_balance_dest: f64,

    /// Amount exactly as it appeared in the request body
    #[serde(skip)]
    pub amount_literal: Option<Number>,
}

impl TransactionInput {
    /// Keys every request must carry, checked in this order.
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "amount",
        "type",
        "oldbalanceOrg",
        "newbalanceOrig",
        "oldbalanceDest",
        "newbalanceDest",
    ];

    /// Validate an untrusted JSON body.
    ///
    /// Presence of every required key is checked first, then the transaction
    /// type, then that the remaining fields are numbers. Extra keys are ignored.
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        let fields = body.as_object().ok_or(ApiError::InvalidBody)?;

        if let Some(missing) = Self::REQUIRED_FIELDS
            .iter()
            .find(|field| !fields.contains_key(**field))
        {
            return Err(ApiError::MissingField(*missing));
        }

        let transaction_type = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ApiError::InvalidTransactionType)?
            .parse::<TransactionType>()?;

        Ok(Self {
            amount: number(fields, "amount")?,
            transaction_type,
            old_balance_orig: number(fields, "oldbalanceOrg")?,
            new_balance_orig: number(fields, "newbalanceOrig")?,
            old_balance_dest: number(fields, "oldbalanceDest")?,
            new_balance_dest: number(fields, "newbalanceDest")?,
            amount_literal: match fields.get("amount") {
                Some(Value::Number(n)) => Some(n.clone()),
                _ => None,
            },
        })
    }

    /// Create a transaction with zeroed balances
    pub fn new(amount: f64, transaction_type: TransactionType) -> Self {
        Self {
            amount,
            transaction_type,
            old_balance_orig: 0.0,
            new_balance_orig: 0.0,
            old_balance_dest: 0.0,
            new_balance_dest: 0.0,
            amount_literal: None,
        }
    }

    pub fn with_orig_balances(mut self, old: f64, new: f64) -> Self {
        self.old_balance_orig = old;
        self.new_balance_orig = new;
        self
    }

    pub fn with_dest_balances(mut self, old: f64, new: f64) -> Self {
        self.old_balance_dest = old;
        self.new_balance_dest = new;
        self
    }
}

fn number(fields: &Map<String, Value>, field: &'static str) -> Result<f64, ApiError> {
    fields
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(ApiError::InvalidField(field))
}
