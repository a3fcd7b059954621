//! In-memory implementation of the LedgerStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::LedgerStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
/// The BTreeMap keeps scans in ascending height order for free.
pub struct MemoryStore {
    blocks: RwLock<BTreeMap<u64, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(&self, height: u64, block: &[u8]) -> Result<()> {
        let mut blocks = self.blocks.write().unwrap();
        blocks.insert(height, block.to_vec());
        Ok(())
    }

    async fn get(&self, height: u64) -> Result<Option<Vec<u8>>> {
        let blocks = self.blocks.read().unwrap();
        Ok(blocks.get(&height).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Vec<u8>>> {
        let blocks = self.blocks.read().unwrap();
        Ok(blocks.values().cloned().collect())
    }
}
