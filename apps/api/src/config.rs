use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_NESSIE_BASE_URL: &str = "http://api.nessieisreal.com";

/// Upper bound for `SESSION_IDLE_SECS` (one year).
const MAX_SESSION_IDLE_SECS: u64 = 365 * 24 * 60 * 60;

/// Demo customers seeded in the Nessie sandbox, selectable by index.
pub const DEFAULT_CUSTOMER_IDS: &[&str] = &[
    "68d854ba9683f20dd5196bef",
    "68d854be9683f20dd5196c20",
    "68d854c29683f20dd5196c56",
];

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// When unset, transactions come from `transactions_file` instead of Nessie.
    pub nessie_api_key: Option<String>,
    pub nessie_base_url: String,
    pub customer_ids: Vec<String>,
    pub transactions_file: PathBuf,
    pub http_timeout_secs: u64,
    /// Sessions idle longer than this are discarded.
    pub session_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            nessie_api_key: optional_env("NESSIE_API_KEY"),
            nessie_base_url: optional_env("NESSIE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NESSIE_BASE_URL.to_string()),
            customer_ids: optional_env("NESSIE_CUSTOMER_IDS")
                .map(|raw| parse_customer_ids(&raw))
                .unwrap_or_else(|| DEFAULT_CUSTOMER_IDS.iter().map(|s| s.to_string()).collect()),
            transactions_file: optional_env("TRANSACTIONS_FILE")
                .unwrap_or_else(|| "transactions.json".to_string())
                .into(),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            session_idle_secs: std::env::var("SESSION_IDLE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn session_idle_ttl(&self) -> chrono::Duration {
        let secs = self.session_idle_secs.min(MAX_SESSION_IDLE_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn customer_count(&self) -> usize {
        self.customer_ids.len()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_customer_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
