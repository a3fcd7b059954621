//! # Starlog Core
//!
//! Pure primitives for the starlog ledger: blocks, canonical encoding,
//! wallet crypto, and star-story rules.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One entry in the hash-chained ledger
//! - [`BlockHash`] - Blake3 digest linking adjacent blocks
//! - [`WalletAddress`] - Hex-encoded Ed25519 public key owning a record
//! - [`StarRecord`] - The star-registry payload of a non-genesis block
//!
//! ## Canonicalization
//!
//! Blocks are encoded as deterministic CBOR; the block hash is computed
//! over the encoding with the hash field held empty. See [`codec`].

pub mod block;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod story;
pub mod types;

pub use block::{Block, BlockBody, StarCoordinates, StarRecord, GENESIS_BODY};
pub use codec::{decode_block, decode_story, encode_block, encode_story, hash_input_bytes};
pub use crypto::{verify_challenge_signature, Wallet};
pub use error::{CodecError, CoreError};
pub use story::{validate_story, StoryError, MAX_STORY_BYTES, MAX_STORY_WORDS};
pub use types::{BlockHash, WalletAddress};
