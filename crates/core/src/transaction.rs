use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "CREDIT"),
            TransactionKind::Debit => write!(f, "DEBIT"),
        }
    }
}

/// One statement row. Built by the extractor, filtered by the validator,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Signed: positive = credit, negative = debit.
    pub amount: Money,
    /// Running balance after this row, as printed on the statement.
    pub balance: Money,
    /// Always derived from the sign of `amount`.
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: String, amount: Money, balance: Money) -> Self {
        let kind = if amount.is_negative() {
            TransactionKind::Debit
        } else {
            TransactionKind::Credit
        };
        Transaction {
            date,
            description,
            amount,
            balance,
            kind,
        }
    }

    /// Row-level validity: a usable description and a non-trivial amount.
    pub fn is_valid(&self) -> bool {
        self.description.trim().len() > 3 && self.amount.abs() > Money::from_cents(1)
    }

    /// Composite identity used for cross-page deduplication.
    pub fn dedup_key(&self) -> (NaiveDate, String, i64) {
        (self.date, self.description.clone(), self.amount.to_cents())
    }
}
