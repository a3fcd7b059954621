//! The request registry: per-address challenge state and authorizations.
//!
//! State is an explicit object owned by the service instance and injected
//! into callers, never ambient globals. Expiry runs as one cancellable
//! scheduled task per challenge; a generation counter checked under the
//! registry lock guarantees that "expire" and "authorize" can never both
//! apply to the same pending instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use starlog_core::{verify_challenge_signature, WalletAddress};

use crate::challenge::{challenge_message, AuthorizationGrant, ChallengeStatus, ValidationChallenge};
use crate::config::{AuthorizationPolicy, RegistryConfig};
use crate::error::{RegistryError, Result};

/// Where an address currently stands in the validation flow.
///
/// `Expired` is externally indistinguishable from `NoRequest`: once the
/// window elapses the challenge is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressState {
    NoRequest,
    Pending,
    Authorized,
}

struct PendingEntry {
    request_timestamp: i64,
    issued: Instant,
    generation: u64,
    expiry: JoinHandle<()>,
}

struct AuthorizedEntry {
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Inner {
    pending: HashMap<WalletAddress, PendingEntry>,
    authorized: HashMap<WalletAddress, AuthorizedEntry>,
    next_generation: u64,
}

/// The validation-request registry.
///
/// Process-lifetime state only: challenges and authorizations are lost on
/// restart by design. Must live inside a tokio runtime (expiry timers are
/// spawned tasks).
pub struct RequestRegistry {
    inner: Arc<Mutex<Inner>>,
    config: RegistryConfig,
}

impl RequestRegistry {
    /// Create a registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            config,
        }
    }

    /// The configured validation window.
    pub fn validation_window(&self) -> Duration {
        self.config.validation_window
    }

    /// Request a challenge for an address.
    ///
    /// A first request creates the challenge and starts its expiry timer.
    /// A repeat request within the window returns the same message with
    /// the remaining window recomputed; the issue timestamp is never
    /// reset.
    pub fn request_challenge(&self, address: &WalletAddress) -> ValidationChallenge {
        let mut inner = self.inner.lock().expect("registry lock poisoned");

        if let Some(entry) = inner.pending.get(address) {
            let remaining = self
                .config
                .validation_window
                .saturating_sub(entry.issued.elapsed());
            return ValidationChallenge {
                address: address.clone(),
                request_timestamp: entry.request_timestamp,
                message: challenge_message(address, entry.request_timestamp),
                validation_window: remaining.as_secs(),
            };
        }

        let generation = inner.next_generation;
        inner.next_generation += 1;

        let request_timestamp = now_secs();
        let expiry = tokio::spawn(expire_pending(
            Arc::clone(&self.inner),
            address.clone(),
            generation,
            self.config.validation_window,
        ));

        inner.pending.insert(
            address.clone(),
            PendingEntry {
                request_timestamp,
                issued: Instant::now(),
                generation,
                expiry,
            },
        );

        tracing::debug!(address = %address, "validation challenge issued");

        ValidationChallenge {
            address: address.clone(),
            request_timestamp,
            message: challenge_message(address, request_timestamp),
            validation_window: self.config.validation_window.as_secs(),
        }
    }

    /// Verify a signature against the address's live challenge.
    ///
    /// On success the challenge is consumed, its timer cancelled, and the
    /// address enters the submission authorization set. On failure the
    /// challenge stays pending so the caller may retry before expiry.
    pub fn verify_signature(
        &self,
        address: &WalletAddress,
        signature_hex: &str,
    ) -> Result<AuthorizationGrant> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");

        // Remove-then-reinsert keeps the transition authoritative under
        // the lock: an expiry firing now finds its generation gone.
        let entry = match inner.pending.remove(address) {
            Some(entry) => entry,
            None => return Err(RegistryError::NoChallenge(address.clone())),
        };

        let message = challenge_message(address, entry.request_timestamp);
        if let Err(e) = verify_challenge_signature(&message, address, signature_hex) {
            tracing::debug!(address = %address, error = %e, "signature verification failed");
            inner.pending.insert(address.clone(), entry);
            return Err(RegistryError::InvalidSignature(address.clone()));
        }

        entry.expiry.abort();

        let remaining = self
            .config
            .validation_window
            .saturating_sub(entry.issued.elapsed());

        let auth_expiry = match self.config.authorization_policy {
            AuthorizationPolicy::KeepUntilUsed => None,
            AuthorizationPolicy::ExpireAfter(ttl) => Some(tokio::spawn(expire_authorization(
                Arc::clone(&self.inner),
                address.clone(),
                entry.generation,
                ttl,
            ))),
        };

        inner.authorized.insert(
            address.clone(),
            AuthorizedEntry {
                generation: entry.generation,
                expiry: auth_expiry,
            },
        );

        tracing::debug!(address = %address, "address authorized to submit one star");

        Ok(AuthorizationGrant {
            register_star: true,
            status: ChallengeStatus {
                address: address.clone(),
                request_timestamp: entry.request_timestamp,
                message,
                validation_window: remaining.as_secs(),
                message_signature: "valid",
            },
        })
    }

    /// Consume an authorization. Returns whether the address held one.
    ///
    /// One-time use: a second call for the same grant returns false.
    pub fn take_authorization(&self, address: &WalletAddress) -> bool {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        match inner.authorized.remove(address) {
            Some(entry) => {
                if let Some(handle) = entry.expiry {
                    handle.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Whether the address currently holds a submission authorization.
    pub fn is_authorized(&self, address: &WalletAddress) -> bool {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner.authorized.contains_key(address)
    }

    /// The address's current position in the flow.
    pub fn state(&self, address: &WalletAddress) -> AddressState {
        let inner = self.inner.lock().expect("registry lock poisoned");
        if inner.authorized.contains_key(address) {
            AddressState::Authorized
        } else if inner.pending.contains_key(address) {
            AddressState::Pending
        } else {
            AddressState::NoRequest
        }
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Expiry task for a pending challenge.
///
/// The generation check means a challenge consumed and reissued while this
/// task slept is left alone.
async fn expire_pending(
    inner: Arc<Mutex<Inner>>,
    address: WalletAddress,
    generation: u64,
    window: Duration,
) {
    tokio::time::sleep(window).await;

    let mut inner = inner.lock().expect("registry lock poisoned");
    let live = inner
        .pending
        .get(&address)
        .is_some_and(|e| e.generation == generation);
    if live {
        inner.pending.remove(&address);
        tracing::debug!(address = %address, "validation challenge expired");
    }
}

/// Expiry task for an unused authorization (ExpireAfter policy only).
async fn expire_authorization(
    inner: Arc<Mutex<Inner>>,
    address: WalletAddress,
    generation: u64,
    ttl: Duration,
) {
    tokio::time::sleep(ttl).await;

    let mut inner = inner.lock().expect("registry lock poisoned");
    let live = inner
        .authorized
        .get(&address)
        .is_some_and(|e| e.generation == generation);
    if live {
        inner.authorized.remove(&address);
        tracing::debug!(address = %address, "unused submission authorization lapsed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use starlog_core::Wallet;

    fn registry() -> RequestRegistry {
        RequestRegistry::new(RegistryConfig::default())
    }

    async fn settle() {
        // Let any due expiry task take its turn.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_request_same_message_shrinking_window() {
        let reg = registry();
        let address = WalletAddress::from("addr1");

        let first = reg.request_challenge(&address);
        assert_eq!(first.validation_window, 300);

        tokio::time::sleep(Duration::from_secs(10)).await;

        let second = reg.request_challenge(&address);
        assert_eq!(second.message, first.message);
        assert_eq!(second.request_timestamp, first.request_timestamp);
        assert!(second.validation_window <= first.validation_window);
        assert_eq!(second.validation_window, 290);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_does_not_reset_window() {
        let reg = registry();
        let address = WalletAddress::from("addr1");

        reg.request_challenge(&address);
        tokio::time::sleep(Duration::from_secs(100)).await;
        let refreshed = reg.request_challenge(&address);
        assert_eq!(refreshed.validation_window, 200);

        // The refresh must not have pushed expiry out.
        tokio::time::sleep(Duration::from_secs(201)).await;
        settle().await;
        assert_eq!(reg.state(&address), AddressState::NoRequest);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_challenge_behaves_as_no_request() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x01; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        let signature = wallet.sign(&challenge.message);

        tokio::time::sleep(Duration::from_secs(301)).await;
        settle().await;

        let result = reg.verify_signature(&address, &signature);
        assert!(matches!(result, Err(RegistryError::NoChallenge(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_signature_authorizes() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x02; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        tokio::time::sleep(Duration::from_secs(5)).await;

        let grant = reg
            .verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();

        assert!(grant.register_star);
        assert_eq!(grant.status.message, challenge.message);
        assert_eq!(grant.status.message_signature, "valid");
        assert_eq!(grant.status.validation_window, 295);
        assert_eq!(reg.state(&address), AddressState::Authorized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_signature_leaves_challenge_pending() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x03; 32]);
        let intruder = Wallet::from_seed(&[0x04; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);

        let result = reg.verify_signature(&address, &intruder.sign(&challenge.message));
        assert!(matches!(result, Err(RegistryError::InvalidSignature(_))));
        assert_eq!(reg.state(&address), AddressState::Pending);

        // A retry with the right wallet still goes through.
        reg.verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();
        assert_eq!(reg.state(&address), AddressState::Authorized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_timer_cannot_discard_consumed_challenge() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x05; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        reg.verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();

        // Ride past the original expiry deadline; the cancelled timer (and
        // its generation check, had it fired) must leave the grant alone.
        tokio::time::sleep(Duration::from_secs(400)).await;
        settle().await;

        assert!(reg.is_authorized(&address));
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_authorization_is_one_time() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x06; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        reg.verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();

        assert!(reg.take_authorization(&address));
        assert!(!reg.take_authorization(&address));
        assert_eq!(reg.state(&address), AddressState::NoRequest);
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorization_keeps_until_used_by_default() {
        let reg = registry();
        let wallet = Wallet::from_seed(&[0x07; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        reg.verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();

        tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        settle().await;
        assert!(reg.is_authorized(&address));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_after_policy_lapses_unused_grant() {
        let reg = RequestRegistry::new(RegistryConfig {
            authorization_policy: AuthorizationPolicy::ExpireAfter(Duration::from_secs(60)),
            ..RegistryConfig::default()
        });
        let wallet = Wallet::from_seed(&[0x08; 32]);
        let address = wallet.address();

        let challenge = reg.request_challenge(&address);
        reg.verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();
        assert!(reg.is_authorized(&address));

        tokio::time::sleep(Duration::from_secs(61)).await;
        settle().await;
        assert!(!reg.is_authorized(&address));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reissued_challenge_gets_fresh_window() {
        let reg = registry();
        let address = WalletAddress::from("addr1");

        reg.request_challenge(&address);
        tokio::time::sleep(Duration::from_secs(301)).await;
        settle().await;

        let fresh = reg.request_challenge(&address);
        assert_eq!(fresh.validation_window, 300);
    }
}
