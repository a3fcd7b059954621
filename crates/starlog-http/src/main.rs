//! Starlog HTTP service binary.
//!
//! This binary exposes the ledger over a small HTTP API:
//!
//! - `GET /health`
//! - `GET /block/:height`
//! - `GET /stars/:selector` (`hash:<hex>` or `address:<addr>`)
//! - `POST /block`
//! - `POST /requestValidation`
//! - `POST /message-signature/validate`
//!
//! It embeds a SQLite-backed chain, the validation-request registry, and
//! the submission gateway.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::signal;

use starlog::registry::{RegistryConfig, RequestRegistry};
use starlog::store::SqliteStore;
use starlog::{Chain, Gateway};

use config::HttpConfig;
use routes::{blocks, health, stars, validation};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "starlog_http=info,starlog=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = HttpConfig::from_env()?;

    let store = SqliteStore::open(&config.db_path)?;
    let chain = Arc::new(Chain::open(store).await?);
    tracing::info!(
        db = %config.db_path.display(),
        blocks = chain.block_count().await?,
        "ledger opened",
    );

    let registry = Arc::new(RequestRegistry::new(RegistryConfig::default()));
    let gateway = Gateway::new(chain, registry);

    let app_state: SharedState = Arc::new(AppState { gateway });

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/block/:height", get(blocks::get_block))
        .route("/block", post(blocks::submit_block))
        .route("/stars/:selector", get(stars::get_stars))
        .route("/requestValidation", post(validation::request_validation))
        .route(
            "/message-signature/validate",
            post(validation::validate_signature),
        )
        .with_state(app_state);

    tracing::info!("starlog listening on http://{}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
