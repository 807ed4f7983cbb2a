mod config;
mod errors;
mod llm_client;
mod markdown;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, SEARCH_MODEL, SUMMARY_MODEL};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key before any request is made)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hunter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model client once; handlers share it through AppState
    let llm = GeminiClient::new(
        config.api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!(
        "Gemini client initialized (search: {SEARCH_MODEL}, summary: {SUMMARY_MODEL}, base: {})",
        config.gemini_api_base
    );

    let state = AppState { llm: Arc::new(llm) };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
