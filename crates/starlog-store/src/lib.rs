//! # Starlog Store
//!
//! Storage abstraction for the starlog ledger. Provides a trait-based
//! interface for block persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store is a persistent ordered mapping from block height to the
//! block's canonical bytes. It knows nothing about hashes or chain
//! linkage; that is the chain engine's business. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for tests.
//!
//! ## Key Types
//!
//! - [`LedgerStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Design Notes
//!
//! - **Put semantics**: appending at an existing height overwrites it. The
//!   single-writer serialization point lives one layer up, in the chain
//!   engine.
//! - **O(N) length**: `block_count` counts a full scan by design; there is
//!   no auxiliary counter to fall out of sync.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::LedgerStore;
