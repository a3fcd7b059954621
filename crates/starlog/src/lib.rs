//! # Starlog
//!
//! The unified API for the starlog system: a minimal append-only ledger
//! that records star ownership claims after a signed proof of wallet
//! control.
//!
//! ## Overview
//!
//! - **Blocks**: Immutable, hash-chained entries. Height 0 is a fixed
//!   sentinel genesis; every other block carries one star record.
//! - **Chain**: The append/lookup/audit engine, generic over storage.
//!   Appends are serialized through a single writer lock.
//! - **Registry**: Per-address validation challenges with a fixed time
//!   window, verified by Ed25519 signature.
//! - **Gateway**: The only write path. One verified challenge buys exactly
//!   one star registration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use starlog::{Chain, Gateway, StarRequest};
//! use starlog::core::Wallet;
//! use starlog::registry::{RegistryConfig, RequestRegistry};
//! use starlog::store::SqliteStore;
//!
//! async fn example() {
//!     let wallet = Wallet::generate();
//!     let address = wallet.address();
//!
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     let chain = Arc::new(Chain::open(store).await.unwrap());
//!     let registry = Arc::new(RequestRegistry::new(RegistryConfig::default()));
//!     let gateway = Gateway::new(chain, registry);
//!
//!     // Prove control of the address, then register a star.
//!     let challenge = gateway.registry().request_challenge(&address);
//!     gateway
//!         .registry()
//!         .verify_signature(&address, &wallet.sign(&challenge.message))
//!         .unwrap();
//!
//!     let block = gateway
//!         .submit(
//!             &address,
//!             StarRequest {
//!                 right_ascension: "16h 29m 1.0s".into(),
//!                 declination: "-26° 29' 24.9\"".into(),
//!                 story: "Found star using https://www.google.com/sky/".into(),
//!             },
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("registered at height {}", block.height);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `starlog::core` - Block model, codec, wallet crypto, story rules
//! - `starlog::store` - Storage abstraction and SQLite
//! - `starlog::registry` - The validation-challenge state machine

pub mod chain;
pub mod error;
pub mod gateway;

// Re-export component crates
pub use starlog_core as core;
pub use starlog_registry as registry;
pub use starlog_store as store;

// Re-export main types for convenience
pub use chain::{Chain, IntegrityError};
pub use error::{ChainError, GatewayError, Result};
pub use gateway::{Gateway, StarRequest};

// Re-export commonly used core types
pub use starlog_core::{
    Block, BlockBody, BlockHash, StarCoordinates, StarRecord, StoryError, Wallet, WalletAddress,
};
