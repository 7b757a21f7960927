//! Patchbay server binary.
//!
//! A stateless relay between a chat UI, an OpenAI-compatible completion API,
//! and a GitHub-hosted repository. The server holds no conversation history
//! and no file cache; every request carries its full context.

mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env();
    if config.completion_api_key.is_none() {
        tracing::warn!("NEBIUS_API_KEY is not set; /api/chat will report NotConfigured");
    }
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; repository routes will report NotConfigured");
    }

    let state = AppState::from_config(&config);
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, "patchbay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failure")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
        // Returning here would read as a shutdown request; keep serving.
        std::future::pending::<()>().await;
    }
}
