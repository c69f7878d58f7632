mod chat;
mod config;
mod errors;
mod journal;
mod llm_client;
mod routes;
mod sanitize;
mod session;
mod state;
#[cfg(test)]
mod testing;
mod transactions;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::transactions::source::{FileSource, NessieSource, TransactionSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Finn API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(config.gemini_api_key.clone(), config.http_timeout())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize transaction source (Nessie sandbox if keyed, mock file otherwise)
    let source: Arc<dyn TransactionSource> = match &config.nessie_api_key {
        Some(key) => {
            info!(
                "Using Nessie at {} ({} customers)",
                config.nessie_base_url,
                config.customer_count()
            );
            Arc::new(NessieSource::new(
                config.nessie_base_url.clone(),
                key.clone(),
                config.customer_ids.clone(),
                config.http_timeout(),
            )?)
        }
        None => {
            info!(
                "NESSIE_API_KEY not set; serving {}",
                config.transactions_file.display()
            );
            Arc::new(FileSource::new(config.transactions_file.clone()))
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        source,
        sessions: SessionStore::new(config.session_idle_ttl()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
