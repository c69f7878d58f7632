// Transactions: records, aggregation, sources and the dashboard endpoint.
// Aggregation is pure; all I/O lives in source.rs.

pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod source;

use tracing::warn;

use crate::transactions::models::Transaction;
use crate::transactions::source::{SourceFailure, TransactionSource};

/// Fetches a customer's purchases, absorbing any failure into an empty
/// dataset plus the embeddable error payload.
pub async fn load_transactions(
    source: &dyn TransactionSource,
    user_index: usize,
) -> (Vec<Transaction>, Option<SourceFailure>) {
    match source.fetch(user_index).await {
        Ok(transactions) => (transactions, None),
        Err(e) => {
            warn!(
                "Transaction source '{}' failed for user {user_index}: {e}",
                source.name()
            );
            (Vec::new(), Some(e.to_failure()))
        }
    }
}
