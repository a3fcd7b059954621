//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use starlog::{Chain, Gateway, StarRequest};
use starlog_core::{Block, Wallet, WalletAddress};
use starlog_registry::{RegistryConfig, RequestRegistry};
use starlog_store::MemoryStore;

/// A test fixture: one wallet plus a gateway over an in-memory ledger.
pub struct TestFixture {
    pub wallet: Wallet,
    pub gateway: Gateway<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with a random wallet and default registry config.
    pub async fn new() -> Self {
        Self::with_parts(Wallet::generate(), RegistryConfig::default()).await
    }

    /// Create with a deterministic wallet from seed.
    pub async fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_parts(Wallet::from_seed(&seed), RegistryConfig::default()).await
    }

    /// Create with an explicit wallet and registry configuration.
    pub async fn with_parts(wallet: Wallet, config: RegistryConfig) -> Self {
        let chain = Arc::new(
            Chain::open(MemoryStore::new())
                .await
                .expect("memory chain open"),
        );
        let registry = Arc::new(RequestRegistry::new(config));
        Self {
            wallet,
            gateway: Gateway::new(chain, registry),
        }
    }

    /// The fixture wallet's address.
    pub fn address(&self) -> WalletAddress {
        self.wallet.address()
    }

    /// The underlying chain.
    pub fn chain(&self) -> &Chain<MemoryStore> {
        self.gateway.chain()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RequestRegistry {
        self.gateway.registry()
    }

    /// Run the challenge and signature steps for the fixture wallet.
    pub fn authorize(&self) {
        self.authorize_wallet(&self.wallet);
    }

    /// Run the challenge and signature steps for any wallet.
    pub fn authorize_wallet(&self, wallet: &Wallet) {
        let address = wallet.address();
        let challenge = self.registry().request_challenge(&address);
        self.registry()
            .verify_signature(&address, &wallet.sign(&challenge.message))
            .expect("fixture signature verification");
    }

    /// Authorize and register a star in one step.
    pub async fn register(&self, story: &str) -> Block {
        self.register_for(&self.wallet, story).await
    }

    /// Authorize and register a star for any wallet.
    pub async fn register_for(&self, wallet: &Wallet, story: &str) -> Block {
        self.authorize_wallet(wallet);
        self.gateway
            .submit(&wallet.address(), star_request(story))
            .await
            .expect("fixture star registration")
    }
}

/// A well-formed submission with the given story.
pub fn star_request(story: &str) -> StarRequest {
    StarRequest {
        right_ascension: "16h 29m 1.0s".into(),
        declination: "-26° 29' 24.9\"".into(),
        story: story.into(),
    }
}

/// Create deterministic wallets for multi-party tests.
pub fn multi_party_wallets(count: usize) -> Vec<Wallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            Wallet::from_seed(&seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_registers_stars() {
        let fixture = TestFixture::with_seed([7u8; 32]).await;
        let block = fixture.register("fixture star").await;
        assert_eq!(block.height, 1);
        assert_eq!(block.owner(), Some(&fixture.address()));
        assert!(fixture.chain().validate_chain().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multi_party_wallets_are_distinct() {
        let wallets = multi_party_wallets(4);
        let fixture = TestFixture::new().await;
        for wallet in &wallets {
            fixture.register_for(wallet, "shared sky").await;
        }

        for (i, wallet) in wallets.iter().enumerate() {
            let blocks = fixture
                .chain()
                .get_by_owner(&wallet.address())
                .await
                .unwrap();
            assert_eq!(blocks.len(), 1);
            assert_eq!(blocks[0].height, i as u64 + 1);
        }
    }
}
