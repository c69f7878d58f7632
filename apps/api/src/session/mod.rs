//! Per-session context: chat history, cached journal entries, login flag and
//! selected demo customer.
//!
//! A session is created by `POST /api/v1/sessions` and discarded by
//! `DELETE /api/v1/sessions/:id` or after sitting idle past the store's TTL.
//! Nothing outlives the process.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::chat::prompts::GREETING;
use crate::errors::AppError;
use crate::journal::JournalEntry;

/// Hardcoded demo logins. Not a security boundary.
const DEMO_CREDENTIALS: &[(&str, &str)] = &[
    ("admin", "password123"),
    ("avik", "gt2025"),
    ("guest", "welcome"),
];

pub fn check_credentials(username: &str, password: &str) -> bool {
    DEMO_CREDENTIALS
        .iter()
        .any(|(user, pass)| *user == username && *pass == password)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat exchanges kept per session; older ones are dropped, the greeting stays.
pub const MAX_CHAT_EXCHANGES: usize = 50;

/// Journal cache key: (selected customer index, week start).
pub type JournalKey = (usize, NaiveDate);

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub authenticated: bool,
    pub username: Option<String>,
    pub user_index: usize,
    pub messages: Vec<ChatMessage>,
    pub journal_cache: HashMap<JournalKey, JournalEntry>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_seen: now,
            authenticated: false,
            username: None,
            user_index: 0,
            messages: vec![ChatMessage::assistant(GREETING)],
            journal_cache: HashMap::new(),
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, idle_ttl: Duration) -> bool {
        now - self.last_seen > idle_ttl
    }

    /// Appends one question/reply pair, dropping the oldest exchanges past
    /// [`MAX_CHAT_EXCHANGES`]. The greeting at index 0 is kept.
    pub fn push_exchange(&mut self, question: ChatMessage, reply: ChatMessage) {
        self.messages.push(question);
        self.messages.push(reply);

        let limit = 1 + 2 * MAX_CHAT_EXCHANGES;
        if self.messages.len() > limit {
            let excess = self.messages.len() - limit;
            self.messages.drain(1..1 + excess);
        }
    }

    /// Cached journal entries for the currently selected customer.
    pub fn cached_journal(&self) -> HashMap<NaiveDate, JournalEntry> {
        self.journal_cache
            .iter()
            .filter(|((index, _), _)| *index == self.user_index)
            .map(|((_, week), entry)| (*week, entry.clone()))
            .collect()
    }
}

pub const DEFAULT_IDLE_TTL_SECS: i64 = 60 * 60;

/// In-memory session registry. Cloning shares the same map.
///
/// Callers get snapshots; the lock is never held across an external call.
/// Sessions idle longer than `idle_ttl` behave as if ended and are swept
/// whenever a new session is created.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_IDLE_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(session.created_at, self.idle_ttl));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!("Swept {swept} idle sessions");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.update(id, |s| s.clone()).await
    }

    /// Applies `f` to the live session and returns its result, or `None` if
    /// the session no longer exists. Counts as activity.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        if sessions
            .get(&id)
            .is_some_and(|s| s.is_expired(now, self.idle_ttl))
        {
            sessions.remove(&id);
            return None;
        }

        sessions.get_mut(&id).map(|s| {
            s.last_seen = now;
            f(s)
        })
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Snapshot of a session that exists and is logged in.
    pub async fn require_authenticated(&self, id: Uuid) -> Result<Session, AppError> {
        let session = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        if !session.authenticated {
            return Err(AppError::Unauthorized);
        }
        Ok(session)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
