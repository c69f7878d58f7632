//! Axum route handlers for session lifecycle, demo login and customer selection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{check_credentials, Session};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectUserRequest {
    pub user_index: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub authenticated: bool,
    pub username: Option<String>,
    pub user_index: usize,
    pub customer_count: usize,
}

impl SessionView {
    fn from_session(session: &Session, customer_count: usize) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            authenticated: session.authenticated,
            username: session.username.clone(),
            user_index: session.user_index,
            customer_count,
        }
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    info!("Session {} started", session.id);
    (
        StatusCode::CREATED,
        Json(SessionView::from_session(&session, state.config.customer_count())),
    )
}

/// GET /api/v1/sessions/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(SessionView::from_session(
        &session,
        state.config.customer_count(),
    )))
}

/// DELETE /api/v1/sessions/:session_id
///
/// Ends the session; chat history and cached journal entries go with it.
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(session_id).await {
        return Err(session_not_found(session_id));
    }
    info!("Session {session_id} ended");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/login
pub async fn handle_login(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionView>, AppError> {
    if state.sessions.get(session_id).await.is_none() {
        return Err(session_not_found(session_id));
    }
    if !check_credentials(&request.username, &request.password) {
        return Err(AppError::InvalidCredentials);
    }

    let session = state
        .sessions
        .update(session_id, |s| {
            s.authenticated = true;
            s.username = Some(request.username.clone());
            s.clone()
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    info!("User {} logged in on session {session_id}", request.username);
    Ok(Json(SessionView::from_session(
        &session,
        state.config.customer_count(),
    )))
}

/// POST /api/v1/sessions/:session_id/logout
///
/// Clears the login flag only; history and cache live until the session ends.
pub async fn handle_logout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .update(session_id, |s| {
            s.authenticated = false;
            s.username = None;
            s.clone()
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(SessionView::from_session(
        &session,
        state.config.customer_count(),
    )))
}

/// PUT /api/v1/sessions/:session_id/user
///
/// Selects which demo customer the dashboard, chat and journal read from.
pub async fn handle_select_user(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectUserRequest>,
) -> Result<Json<SessionView>, AppError> {
    state.sessions.require_authenticated(session_id).await?;

    let available = state.config.customer_count();
    if request.user_index >= available {
        return Err(AppError::Validation(format!(
            "user_index must be below {available}"
        )));
    }

    let session = state
        .sessions
        .update(session_id, |s| {
            s.user_index = request.user_index;
            s.clone()
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(SessionView::from_session(&session, available)))
}
