//! Ledger transaction records as the store backend hands them over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Debt rows carry purchases and returns; payment rows settle money only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "debt")]
    Debt,
    #[serde(rename = "payment")]
    Payment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debt => "debt",
            TransactionKind::Payment => "payment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debt" => Some(TransactionKind::Debt),
            "payment" => Some(TransactionKind::Payment),
            _ => None,
        }
    }
}

/// A single client ledger entry.
///
/// Returnable containers live only in `description`; nothing here is
/// structured beyond the row kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Opaque identifier from the backend
    pub id: String,
    pub date: DateTime<Utc>,
    /// Free text, e.g. "3 Chopines Beer, 2 Bouteilles Vin"
    pub description: String,
    /// Non-negative for debts; not used by reconciliation
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount: 0.0,
            kind: TransactionKind::Debt,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_debt(&self) -> bool {
        self.kind == TransactionKind::Debt
    }

    pub fn is_payment(&self) -> bool {
        self.kind == TransactionKind::Payment
    }
}
