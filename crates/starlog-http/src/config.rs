//! HTTP service configuration.
//!
//! Listen address and database path, with environment overrides for
//! container deployments.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the starlog HTTP server.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Path of the SQLite ledger file.
    pub db_path: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        // Bind to all interfaces so a container port mapping is reachable
        // from the host.
        let addr: SocketAddr = "0.0.0.0:8000"
            .parse()
            .expect("hard-coded listen address should parse");
        Self {
            listen_addr: addr,
            db_path: PathBuf::from("starlog.db"),
        }
    }
}

impl HttpConfig {
    /// Defaults overridden by `STARLOG_LISTEN_ADDR` and `STARLOG_DB`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("STARLOG_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid STARLOG_LISTEN_ADDR {addr:?}: {e}"))?;
        }
        if let Ok(path) = std::env::var("STARLOG_DB") {
            config.db_path = PathBuf::from(path);
        }
        Ok(config)
    }
}
