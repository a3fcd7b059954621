//! Error types for starlog core.

use thiserror::Error;

/// Errors from wallet crypto operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("address is not a valid ed25519 public key: {0}")]
    InvalidAddress(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid signature")]
    InvalidSignature,
}

/// Errors from encoding or decoding blocks.
///
/// A corrupt block is fatal for that read, not for the process: the
/// caller surfaces it and other ledger operations continue.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("corrupt block encoding: {0}")]
    Corrupt(String),

    #[error("corrupt story encoding: {0}")]
    CorruptStory(String),
}
