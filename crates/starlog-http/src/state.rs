//! Shared application state.

use std::sync::Arc;

use starlog::store::SqliteStore;
use starlog::Gateway;

/// Shared state held by the HTTP handlers.
///
/// This is wrapped in an [`Arc`] and passed to request handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The submission gateway, giving handlers the chain and the registry.
    pub gateway: Gateway<SqliteStore>,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
