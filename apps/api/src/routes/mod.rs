pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::chat::handlers as chat;
use crate::journal::handlers as journal;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::transactions::handlers as transactions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle and demo login
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:session_id",
            get(session::handle_get_session).delete(session::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:session_id/login",
            post(session::handle_login),
        )
        .route(
            "/api/v1/sessions/:session_id/logout",
            post(session::handle_logout),
        )
        .route(
            "/api/v1/sessions/:session_id/user",
            put(session::handle_select_user),
        )
        // Dashboard, chat and journal (login required)
        .route(
            "/api/v1/sessions/:session_id/dashboard",
            get(transactions::handle_dashboard),
        )
        .route(
            "/api/v1/sessions/:session_id/chat",
            get(chat::handle_chat_history).post(chat::handle_chat),
        )
        .route(
            "/api/v1/sessions/:session_id/journal",
            get(journal::handle_journal),
        )
        .with_state(state)
}
