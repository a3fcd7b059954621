//! Error types for the registry module.

use thiserror::Error;

use starlog_core::WalletAddress;

/// Errors that can occur during registry operations.
///
/// These are authorization-flow rejections: always recoverable, and the
/// state machine is left unchanged except where the flow says otherwise
/// (an invalid signature leaves the challenge pending for a retry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No live challenge for the address (never requested, or expired).
    #[error("no pending validation request for {0}")]
    NoChallenge(WalletAddress),

    /// The signature did not verify against the challenge message.
    #[error("invalid signature for {0}")]
    InvalidSignature(WalletAddress),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
