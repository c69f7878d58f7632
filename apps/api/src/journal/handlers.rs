//! Axum route handler for the weekly journal.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::journal::{build_journal, JournalEntry};
use crate::state::AppState;
use crate::transactions::load_transactions;

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub user_index: usize,
    /// Newest week first.
    pub entries: Vec<JournalEntry>,
}

/// GET /api/v1/sessions/:session_id/journal
///
/// Model entries are cached under the customer that was selected when the
/// request started, even if the selection changes before it finishes.
pub async fn handle_journal(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<JournalResponse>, AppError> {
    let session = state.sessions.require_authenticated(session_id).await?;
    let user_index = session.user_index;

    let (transactions, _) = load_transactions(state.source.as_ref(), user_index).await;
    let entries = build_journal(
        state.llm.as_ref(),
        &transactions,
        &session.cached_journal(),
        Utc::now().date_naive(),
    )
    .await;

    let fresh: Vec<JournalEntry> = entries
        .iter()
        .filter(|e| e.is_cacheable())
        .cloned()
        .collect();
    if !fresh.is_empty() {
        state
            .sessions
            .update(session_id, |s| {
                for entry in fresh {
                    s.journal_cache.insert((user_index, entry.week_start), entry);
                }
            })
            .await;
    }

    info!(
        "Journal for session {session_id} (user {user_index}): {} entries",
        entries.len()
    );
    Ok(Json(JournalResponse {
        user_index,
        entries,
    }))
}
