// In-memory fakes for the two external seams, shared by unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionClient, CompletionRequest, LlmError};
use crate::transactions::models::Transaction;
use crate::transactions::source::{SourceError, TransactionSource};

/// Returns a fixed reply (or a fixed error) and records every request.
#[derive(Default)]
pub struct FakeCompletion {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

/// Serves the same transactions for every customer, or always fails.
pub struct StaticSource {
    transactions: Option<Vec<Transaction>>,
}

impl StaticSource {
    pub fn with(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Some(transactions),
        }
    }

    pub fn failing() -> Self {
        Self { transactions: None }
    }
}

#[async_trait]
impl TransactionSource for StaticSource {
    async fn fetch(&self, _user_index: usize) -> Result<Vec<Transaction>, SourceError> {
        self.transactions
            .clone()
            .ok_or_else(|| SourceError::NoAccounts("c1".to_string()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
