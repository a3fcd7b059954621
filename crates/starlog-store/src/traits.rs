//! LedgerStore trait: the abstract interface for block persistence.
//!
//! This trait allows the chain engine to be storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use crate::error::Result;

/// The LedgerStore trait: async interface for block persistence.
///
/// Keys are block heights; values are the block's canonical bytes. Scans
/// return entries in ascending height order.
///
/// # Design Notes
///
/// - **Put semantics**: `append` at an existing height overwrites the
///   stored value, like a key-value `put`. Correct append-only use is the
///   caller's responsibility; the chain engine serializes its writers.
/// - **O(N) length**: the provided `block_count` counts a full `scan_all`.
///   It reflects all completed appends at call time but is not
///   synchronized against appends still in flight.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist block bytes at the given height.
    async fn append(&self, height: u64, block: &[u8]) -> Result<()>;

    /// Get the block bytes at a height, or `None` if absent.
    async fn get(&self, height: u64) -> Result<Option<Vec<u8>>>;

    /// All stored blocks in ascending height order. Finite, restartable
    /// per call.
    async fn scan_all(&self) -> Result<Vec<Vec<u8>>>;

    /// The number of stored blocks, derived by counting a full scan.
    async fn block_count(&self) -> Result<u64> {
        Ok(self.scan_all().await?.len() as u64)
    }
}
