//! Registry configuration.

use std::time::Duration;

/// What happens to a granted submission authorization that is never used.
///
/// The upstream behavior is to keep it until the one-time submission
/// consumes it; single use is the only gate. An expiring policy is offered
/// for deployments that want unused grants to lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationPolicy {
    /// An authorization stays valid until its one submission uses it.
    KeepUntilUsed,
    /// An unused authorization lapses after this long.
    ExpireAfter(Duration),
}

/// Configuration for the request registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long an issued challenge remains answerable.
    pub validation_window: Duration,

    /// Lifetime policy for unused submission authorizations.
    pub authorization_policy: AuthorizationPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validation_window: Duration::from_secs(300),
            authorization_policy: AuthorizationPolicy::KeepUntilUsed,
        }
    }
}
