//! SQLite implementation of the LedgerStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::LedgerStore;

/// SQLite-based store implementation.
///
/// Thread-safe via an internal Mutex around the connection. All operations
/// use spawn_blocking to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure on the connection inside spawn_blocking.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn append(&self, height: u64, block: &[u8]) -> Result<()> {
        let block = block.to_vec();

        self.blocking(move |conn| {
            // Put semantics: a rewrite at an existing height replaces it.
            conn.execute(
                "INSERT INTO blocks (height, block, appended_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(height) DO UPDATE SET block = excluded.block,
                                                   appended_at = excluded.appended_at",
                params![height as i64, block, now_secs()],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, height: u64) -> Result<Option<Vec<u8>>> {
        self.blocking(move |conn| {
            conn.query_row(
                "SELECT block FROM blocks WHERE height = ?1",
                params![height as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn scan_all(&self) -> Result<Vec<Vec<u8>>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare("SELECT block FROM blocks ORDER BY height")?;
            let blocks = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<Vec<u8>>>>()?;
            Ok(blocks)
        })
        .await
    }
}

/// Get current time in seconds.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
