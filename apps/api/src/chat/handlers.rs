//! Axum route handlers for the chat assistant.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::assistant::{answer_question, history_turns};
use crate::chat::composer::ChatContext;
use crate::errors::AppError;
use crate::session::ChatMessage;
use crate::state::AppState;
use crate::transactions::load_transactions;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub answered: bool,
    pub messages: Vec<ChatMessage>,
}

/// GET /api/v1/sessions/:session_id/chat
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let session = state.sessions.require_authenticated(session_id).await?;
    Ok(Json(ChatHistoryResponse {
        messages: session.messages,
    }))
}

/// POST /api/v1/sessions/:session_id/chat
///
/// The question is recorded even when the completion fails; the apology
/// takes the reply's place in history.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let question = request.message.trim();
    if question.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let session = state.sessions.require_authenticated(session_id).await?;
    let (transactions, _) = load_transactions(state.source.as_ref(), session.user_index).await;
    let context = ChatContext::from_transactions(&transactions);

    let outcome = answer_question(
        state.llm.as_ref(),
        history_turns(&session.messages),
        question,
        &context,
    )
    .await;

    info!(
        "Chat turn on session {session_id} (answered: {})",
        outcome.answered
    );

    let messages = state
        .sessions
        .update(session_id, |s| {
            s.push_exchange(
                ChatMessage::user(question),
                ChatMessage::assistant(outcome.reply.clone()),
            );
            s.messages.clone()
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        answered: outcome.answered,
        messages,
    }))
}
