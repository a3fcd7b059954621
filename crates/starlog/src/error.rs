//! Error types for the chain engine and the submission gateway.

use starlog_core::{CodecError, StoryError};
use starlog_store::StoreError;
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored block failed to decode.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// No block at the requested height.
    #[error("no block at height {0}")]
    NotFound(u64),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur during star submission.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The address holds no submission authorization.
    #[error("address is not authorized to register a star: {0}")]
    NotAuthorized(String),

    /// A required request field is missing or empty.
    #[error("invalid submission payload: {0}")]
    InvalidPayload(String),

    /// The star story violates a content limit.
    #[error("invalid star story: {0}")]
    InvalidStory(#[from] StoryError),

    /// Chain-level failure while appending or reading back.
    #[error(transparent)]
    Chain(#[from] ChainError),
}
