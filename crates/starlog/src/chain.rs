//! The chain engine: append, lookup, and integrity checking.
//!
//! The engine is generic over the ledger store and owns the single writer
//! lock. Height is derived by counting stored blocks, so every append must
//! pass through [`Chain::append_record`]; two writers counting at once
//! would otherwise race to the same height.

use std::sync::Arc;

use tokio::sync::Mutex;

use starlog_core::{codec, Block, BlockHash, StarRecord, WalletAddress};
use starlog_store::LedgerStore;

use crate::error::{ChainError, Result};

/// A violation found by [`Chain::validate_chain`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// The stored hash does not match a fresh recomputation.
    #[error("block {height}: stored hash {stored:?} != computed {computed}")]
    HashMismatch {
        height: u64,
        stored: Option<BlockHash>,
        computed: BlockHash,
    },

    /// The block's previous-hash link does not point at its predecessor.
    #[error("block {height}: previous hash {actual:?} != predecessor hash {expected:?}")]
    BrokenLink {
        height: u64,
        expected: Option<BlockHash>,
        actual: Option<BlockHash>,
    },
}

/// The append-only star ledger.
pub struct Chain<S: LedgerStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Serialization point for appends. Reads never take it.
    append_lock: Mutex<()>,
}

impl<S: LedgerStore> Chain<S> {
    /// Open a chain over the given store, writing the genesis block if the
    /// store is empty.
    pub async fn open(store: S) -> Result<Self> {
        let chain = Self {
            store: Arc::new(store),
            append_lock: Mutex::new(()),
        };

        let _guard = chain.append_lock.lock().await;
        if chain.store.get(0).await?.is_none() {
            let genesis = Block::genesis(now_secs());
            chain.store.append(0, &codec::encode_block(&genesis)).await?;
            tracing::info!(hash = %genesis.compute_hash(), "genesis block written");
        }
        drop(_guard);

        Ok(chain)
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of blocks in the ledger (genesis included).
    pub async fn block_count(&self) -> Result<u64> {
        Ok(self.store.block_count().await?)
    }

    /// Append a star record, returning the height it landed at.
    ///
    /// The whole read-head-then-write sequence runs under the append lock,
    /// so concurrent callers get distinct, dense heights. A store failure
    /// here means the block is not in the chain.
    pub async fn append_record(&self, record: StarRecord) -> Result<u64> {
        let _guard = self.append_lock.lock().await;

        let count = self.store.block_count().await?;
        if count == 0 {
            // The first write into an empty ledger is always the sentinel
            // genesis, displacing whatever was submitted. Unreachable
            // through the gateway since open() lays the genesis down.
            let genesis = Block::genesis(now_secs());
            self.store.append(0, &codec::encode_block(&genesis)).await?;
            tracing::info!(hash = %genesis.compute_hash(), "genesis block written");
            return Ok(0);
        }

        self.append_linked(count, record).await
    }

    /// Append `record` at `height`, linking to the block below it.
    /// Caller holds the append lock.
    async fn append_linked(&self, height: u64, record: StarRecord) -> Result<u64> {
        let head = self.get_by_height(height - 1).await?;
        let prev_hash = head.hash.unwrap_or_else(|| head.compute_hash());

        let block = Block::next(height, now_secs(), prev_hash, record);
        self.store.append(height, &codec::encode_block(&block)).await?;

        tracing::info!(height, hash = %block.compute_hash(), "star block appended");
        Ok(height)
    }

    /// Get the block at a height.
    pub async fn get_by_height(&self, height: u64) -> Result<Block> {
        match self.store.get(height).await? {
            Some(bytes) => Ok(codec::decode_block(&bytes)?),
            None => Err(ChainError::NotFound(height)),
        }
    }

    /// Find the block with the given hash, scanning from height 0.
    pub async fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        for bytes in self.store.scan_all().await? {
            let block = codec::decode_block(&bytes)?;
            if block.hash == Some(*hash) {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }

    /// All blocks owned by an address, in ascending height order.
    pub async fn get_by_owner(&self, owner: &WalletAddress) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        for bytes in self.store.scan_all().await? {
            let block = codec::decode_block(&bytes)?;
            if block.owner() == Some(owner) {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    /// Check a single block's hash against a fresh recomputation.
    pub async fn validate_block(&self, height: u64) -> Result<bool> {
        let block = self.get_by_height(height).await?;
        if block.hash_is_valid() {
            return Ok(true);
        }

        tracing::warn!(
            height,
            stored = ?block.hash,
            computed = %block.compute_hash(),
            "block hash mismatch",
        );
        Ok(false)
    }

    /// Audit the whole ledger.
    ///
    /// Every block's hash is rechecked and every adjacent pair's linkage is
    /// rechecked; all violations are collected rather than stopping at the
    /// first. Purely diagnostic, never mutates.
    pub async fn validate_chain(&self) -> Result<Vec<IntegrityError>> {
        let mut blocks = Vec::new();
        for bytes in self.store.scan_all().await? {
            blocks.push(codec::decode_block(&bytes)?);
        }

        let mut errors = Vec::new();
        for block in &blocks {
            if !block.hash_is_valid() {
                errors.push(IntegrityError::HashMismatch {
                    height: block.height,
                    stored: block.hash,
                    computed: block.compute_hash(),
                });
            }
        }
        for pair in blocks.windows(2) {
            if pair[1].previous_hash != pair[0].hash {
                errors.push(IntegrityError::BrokenLink {
                    height: pair[1].height,
                    expected: pair[0].hash,
                    actual: pair[1].previous_hash,
                });
            }
        }

        if !errors.is_empty() {
            tracing::warn!(violations = errors.len(), "ledger integrity audit failed");
        }
        Ok(errors)
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
