//! Transaction sources — the only place purchase records enter the service.
//!
//! `NessieSource` talks to the Capital One "Nessie" sandbox; `FileSource`
//! serves the bundled mock data set. Both sit behind `TransactionSource` so
//! handlers never know which one is configured.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::transactions::models::{Transaction, TransactionStatus};

/// Error payload embedded in responses when the upstream source refuses a request.
/// Mirrors what the sandbox returned instead of hiding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub account_id: Option<String>,
    pub status_code: Option<u16>,
    pub response: Value,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Purchases request failed with status {}", .0.status_code.unwrap_or_default())]
    Upstream(SourceFailure),

    #[error("Account lookup failed (status {status}): {body}")]
    AccountLookup { status: u16, body: String },

    #[error("No accounts found for customer {0}")]
    NoAccounts(String),

    #[error("No customer configured at index {index} ({available} available)")]
    UnknownCustomer { index: usize, available: usize },

    #[error("Failed to read transaction file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse transactions: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SourceError {
    /// Converts any source error into the embeddable error payload.
    pub fn to_failure(&self) -> SourceFailure {
        match self {
            SourceError::Upstream(failure) => failure.clone(),
            SourceError::AccountLookup { status, body } => SourceFailure {
                account_id: None,
                status_code: Some(*status),
                response: parse_body(body),
            },
            other => SourceFailure {
                account_id: None,
                status_code: None,
                response: Value::String(other.to_string()),
            },
        }
    }
}

#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetches every purchase for the customer at `user_index`.
    async fn fetch(&self, user_index: usize) -> Result<Vec<Transaction>, SourceError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Nessie sandbox
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Account {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Clone)]
pub struct NessieSource {
    client: Client,
    base_url: String,
    api_key: String,
    customer_ids: Vec<String>,
}

impl NessieSource {
    pub fn new(
        base_url: String,
        api_key: String,
        customer_ids: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            customer_ids,
        })
    }

    fn accounts_url(&self, customer_id: &str) -> String {
        format!(
            "{}/customers/{}/accounts?key={}",
            self.base_url, customer_id, self.api_key
        )
    }

    fn purchases_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}/purchases?key={}",
            self.base_url, account_id, self.api_key
        )
    }

    async fn first_account_id(&self, customer_id: &str) -> Result<String, SourceError> {
        let response = self.client.get(self.accounts_url(customer_id)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::AccountLookup {
                status: status.as_u16(),
                body,
            });
        }

        let accounts: Vec<Account> = response.json().await?;
        accounts
            .into_iter()
            .next()
            .map(|a| a.id)
            .ok_or_else(|| SourceError::NoAccounts(customer_id.to_string()))
    }
}

#[async_trait]
impl TransactionSource for NessieSource {
    async fn fetch(&self, user_index: usize) -> Result<Vec<Transaction>, SourceError> {
        let customer_id =
            self.customer_ids
                .get(user_index)
                .ok_or(SourceError::UnknownCustomer {
                    index: user_index,
                    available: self.customer_ids.len(),
                })?;

        let account_id = self.first_account_id(customer_id).await?;
        debug!("Resolved customer {customer_id} to account {account_id}");

        let response = self.client.get(self.purchases_url(&account_id)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Nessie purchases returned {status} for account {account_id}");
            return Err(SourceError::Upstream(SourceFailure {
                account_id: Some(account_id),
                status_code: Some(status.as_u16()),
                response: parse_body(&body),
            }));
        }

        let mut purchases: Vec<Transaction> = response.json().await?;
        mark_executed(&mut purchases);
        Ok(purchases)
    }

    fn name(&self) -> &'static str {
        "nessie"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mock data file
// ────────────────────────────────────────────────────────────────────────────

/// Serves the same JSON array of purchases to every demo customer.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TransactionSource for FileSource {
    async fn fetch(&self, _user_index: usize) -> Result<Vec<Transaction>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let mut purchases: Vec<Transaction> = serde_json::from_str(&raw)?;
        mark_executed(&mut purchases);
        Ok(purchases)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Records are stamped `executed` locally; the sandbox status is not trusted.
fn mark_executed(purchases: &mut [Transaction]) {
    for purchase in purchases {
        purchase.status = TransactionStatus::Executed;
    }
}

fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
