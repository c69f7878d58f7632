use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::aggregate::derive_category;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Cancelled,
    Completed,
    #[default]
    Executed,
}

/// A single purchase record as returned by the banking sandbox.
///
/// Records are immutable once fetched. The category is never stored; it is
/// derived from `description` on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    pub purchase_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    #[cfg(test)]
    pub fn new(purchase_date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: None,
            purchase_type: None,
            merchant_id: None,
            medium: None,
            purchase_date,
            amount,
            description: description.into(),
            status: TransactionStatus::Executed,
        }
    }

    pub fn category(&self) -> String {
        derive_category(&self.description)
    }
}

/// Transaction plus its derived category, as shown in the dashboard table
/// and embedded in prompts.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub purchase_date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub status: TransactionStatus,
}

impl From<&Transaction> for TransactionView {
    fn from(txn: &Transaction) -> Self {
        Self {
            purchase_date: txn.purchase_date,
            amount: txn.amount,
            description: txn.description.clone(),
            category: txn.category(),
            status: txn.status,
        }
    }
}
