use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::session::SessionStore;
use crate::transactions::source::TransactionSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gemini in production; swapped for a fake in router tests.
    pub llm: Arc<dyn CompletionClient>,
    /// Nessie when `NESSIE_API_KEY` is set, the mock data file otherwise.
    pub source: Arc<dyn TransactionSource>,
    pub sessions: SessionStore,
}
