//! # Starlog Registry
//!
//! The per-address validation-challenge state machine and the submission
//! authorization set.
//!
//! ## Overview
//!
//! Before an address may submit a star, it must prove ownership: it
//! requests a challenge, signs the challenge message with its wallet key,
//! and presents the signature inside a fixed time window. A successful
//! verification moves the address into the submission authorization set,
//! good for exactly one block.
//!
//! States per address:
//!
//! ```text
//! NoRequest --request_challenge--> Pending --verify_signature--> Authorized
//!                                     |
//!                                     +------window elapses----> Expired (= NoRequest)
//! ```
//!
//! All registry state is scoped to the process lifetime by design; it is
//! not persisted and is lost on restart.

pub mod challenge;
pub mod config;
pub mod error;
pub mod registry;

pub use challenge::{challenge_message, AuthorizationGrant, ChallengeStatus, ValidationChallenge};
pub use config::{AuthorizationPolicy, RegistryConfig};
pub use error::{RegistryError, Result};
pub use registry::{AddressState, RequestRegistry};
