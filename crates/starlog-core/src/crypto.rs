//! Wallet crypto: Ed25519 keys behind hex addresses.
//!
//! An address is the hex encoding of an Ed25519 public key. Ownership is
//! proven by signing a server-issued challenge message; verification parses
//! the address back into a verifying key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

use crate::error::CoreError;
use crate::types::WalletAddress;

/// A wallet keypair.
///
/// Servers never hold one of these for clients; it exists so that tests and
/// demo tooling can produce addresses and challenge signatures.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
}

impl Wallet {
    /// Generate a new random wallet.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The wallet's address: hex of the public key.
    pub fn address(&self) -> WalletAddress {
        WalletAddress::new(hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign a challenge message, returning the hex-encoded signature.
    pub fn sign(&self, message: &str) -> String {
        let sig = self.signing_key.sign(message.as_bytes());
        hex::encode(sig.to_bytes())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wallet({})", self.address())
    }
}

/// Verify that `signature_hex` is a valid signature over `message` by the
/// key behind `address`.
///
/// Fails with [`CoreError::InvalidAddress`] if the address is not a hex
/// Ed25519 public key, [`CoreError::MalformedSignature`] if the signature
/// is not 64 hex-encoded bytes, and [`CoreError::InvalidSignature`] if the
/// signature does not check out.
pub fn verify_challenge_signature(
    message: &str,
    address: &WalletAddress,
    signature_hex: &str,
) -> Result<(), CoreError> {
    let key_bytes = hex::decode(address.as_str())
        .map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| CoreError::InvalidAddress("expected 32 bytes".into()))?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| CoreError::InvalidAddress(e.to_string()))?;

    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
    let sig_bytes: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| CoreError::MalformedSignature("expected 64 bytes".into()))?;
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(message.as_bytes(), &signature)
        .map_err(|_| CoreError::InvalidSignature)
}
