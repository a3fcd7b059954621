//! The submission gateway: the only write path for star registrations.
//!
//! Validation order is fixed: authorization first, then payload shape,
//! then story limits, and only then is the authorization consumed and the
//! record appended. A rejected submission never burns the caller's grant.

use std::sync::Arc;

use starlog_core::{codec, story, StarCoordinates, StarRecord, WalletAddress};
use starlog_registry::RequestRegistry;
use starlog_store::LedgerStore;

use crate::chain::Chain;
use crate::error::GatewayError;

/// A star registration as submitted by a caller, story in plain text.
#[derive(Debug, Clone)]
pub struct StarRequest {
    pub right_ascension: String,
    pub declination: String,
    pub story: String,
}

/// The star submission gateway.
pub struct Gateway<S: LedgerStore> {
    chain: Arc<Chain<S>>,
    registry: Arc<RequestRegistry>,
}

impl<S: LedgerStore> Gateway<S> {
    /// Create a gateway over an existing chain and registry.
    pub fn new(chain: Arc<Chain<S>>, registry: Arc<RequestRegistry>) -> Self {
        Self { chain, registry }
    }

    /// The underlying chain.
    pub fn chain(&self) -> &Chain<S> {
        &self.chain
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    /// Register a star for an authorized address.
    ///
    /// Returns the newly appended block, story still in its stored hex
    /// form.
    pub async fn submit(
        &self,
        address: &WalletAddress,
        request: StarRequest,
    ) -> Result<starlog_core::Block, GatewayError> {
        if !self.registry.is_authorized(address) {
            return Err(GatewayError::NotAuthorized(address.as_str().to_owned()));
        }

        if address.is_empty() {
            return Err(GatewayError::InvalidPayload("address is empty".into()));
        }
        if request.right_ascension.is_empty() {
            return Err(GatewayError::InvalidPayload(
                "right ascension is empty".into(),
            ));
        }
        if request.declination.is_empty() {
            return Err(GatewayError::InvalidPayload("declination is empty".into()));
        }
        if request.story.is_empty() {
            return Err(GatewayError::InvalidPayload("story is empty".into()));
        }

        story::validate_story(&request.story)?;

        // Consume only after every validation has passed. A false here
        // means another submission for the same address won the grant.
        if !self.registry.take_authorization(address) {
            return Err(GatewayError::NotAuthorized(address.as_str().to_owned()));
        }

        let record = StarRecord {
            owner: address.clone(),
            star: StarCoordinates {
                right_ascension: request.right_ascension,
                declination: request.declination,
                story: codec::encode_story(&request.story),
            },
        };

        let height = self.chain.append_record(record).await?;
        let block = self.chain.get_by_height(height).await?;

        tracing::info!(height, owner = %address, "star registered");
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlog_core::{StoryError, Wallet};
    use starlog_registry::RegistryConfig;
    use starlog_store::MemoryStore;

    async fn gateway() -> Gateway<MemoryStore> {
        let chain = Arc::new(Chain::open(MemoryStore::new()).await.unwrap());
        let registry = Arc::new(RequestRegistry::new(RegistryConfig::default()));
        Gateway::new(chain, registry)
    }

    fn authorize(gateway: &Gateway<MemoryStore>, wallet: &Wallet) -> WalletAddress {
        let address = wallet.address();
        let challenge = gateway.registry().request_challenge(&address);
        gateway
            .registry()
            .verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();
        address
    }

    fn request(story: &str) -> StarRequest {
        StarRequest {
            right_ascension: "16h 29m 1.0s".into(),
            declination: "-26° 29' 24.9\"".into(),
            story: story.into(),
        }
    }

    #[tokio::test]
    async fn test_submit_requires_authorization() {
        let gw = gateway().await;
        let address = WalletAddress::from("addr1");

        let err = gw.submit(&address, request("hello")).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotAuthorized(_)));
        assert_eq!(gw.chain().block_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_appends_and_returns_block() {
        let gw = gateway().await;
        let wallet = Wallet::from_seed(&[0x11; 32]);
        let address = authorize(&gw, &wallet);

        let block = gw
            .submit(&address, request("Found star using a telescope"))
            .await
            .unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(block.owner(), Some(&address));
        let star = &block.star_record().unwrap().star;
        assert_eq!(
            star.story_decoded().unwrap(),
            "Found star using a telescope"
        );
        assert!(gw.chain().validate_chain().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authorization_is_single_use() {
        let gw = gateway().await;
        let wallet = Wallet::from_seed(&[0x12; 32]);
        let address = authorize(&gw, &wallet);

        gw.submit(&address, request("first")).await.unwrap();
        let err = gw.submit(&address, request("second")).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotAuthorized(_)));
        assert_eq!(gw.chain().block_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_fields_are_rejected_without_consuming_grant() {
        let gw = gateway().await;
        let wallet = Wallet::from_seed(&[0x13; 32]);
        let address = authorize(&gw, &wallet);

        let mut bad = request("fine");
        bad.declination.clear();
        let err = gw.submit(&address, bad).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPayload(_)));

        // The grant survived the rejection.
        gw.submit(&address, request("fine")).await.unwrap();
    }

    #[tokio::test]
    async fn test_story_limits_are_enforced_before_consuming_grant() {
        let gw = gateway().await;
        let wallet = Wallet::from_seed(&[0x14; 32]);
        let address = authorize(&gw, &wallet);

        let too_long = "x".repeat(501);
        let err = gw.submit(&address, request(&too_long)).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidStory(StoryError::TooLong { bytes: 501, .. })
        ));

        let err = gw.submit(&address, request("étoile")).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidStory(StoryError::NonAscii { .. })
        ));

        gw.submit(&address, request("plain ascii story")).await.unwrap();
    }
}
