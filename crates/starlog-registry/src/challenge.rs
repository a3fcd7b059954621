//! Validation challenges and the objects returned to clients.

use serde::Serialize;

use starlog_core::WalletAddress;

/// The fixed domain tag bound into every challenge message.
pub const CHALLENGE_DOMAIN_TAG: &str = "starRegistry";

/// Build the deterministic challenge message for an address and timestamp.
///
/// Format: `"{address}:{timestamp}:starRegistry"`.
pub fn challenge_message(address: &WalletAddress, request_timestamp: i64) -> String {
    format!("{}:{}:{}", address, request_timestamp, CHALLENGE_DOMAIN_TAG)
}

/// A live validation challenge, as returned to the client.
///
/// Repeated requests within the window return the same message with a
/// recomputed (never reset) remaining window.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationChallenge {
    /// The address the challenge was issued to.
    pub address: WalletAddress,

    /// When the challenge was first issued (Unix seconds). Stable across
    /// refreshes.
    #[serde(rename = "requestTimeStamp")]
    pub request_timestamp: i64,

    /// The message the wallet must sign.
    pub message: String,

    /// Seconds left to answer.
    #[serde(rename = "validationWindow")]
    pub validation_window: u64,
}

/// Echo of the consumed challenge inside an [`AuthorizationGrant`].
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeStatus {
    /// The verified address.
    pub address: WalletAddress,

    /// When the consumed challenge was issued (Unix seconds).
    #[serde(rename = "requestTimeStamp")]
    pub request_timestamp: i64,

    /// The message that was signed.
    pub message: String,

    /// Seconds that were left at verification time.
    #[serde(rename = "validationWindow")]
    pub validation_window: u64,

    /// Always `"valid"` in a grant.
    #[serde(rename = "messageSignature")]
    pub message_signature: &'static str,
}

/// The result of a successful signature verification: the address may now
/// submit exactly one star.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationGrant {
    /// Whether the address may register a star. Always true in a grant.
    #[serde(rename = "registerStar")]
    pub register_star: bool,

    /// Echo of the consumed challenge.
    pub status: ChallengeStatus,
}
