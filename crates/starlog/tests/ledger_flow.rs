//! End-to-end ledger flow: challenge, signature, submission, lookup, audit,
//! and persistence across a process restart.

use std::sync::Arc;

use starlog::core::Wallet;
use starlog::registry::{RegistryConfig, RequestRegistry, RegistryError};
use starlog::store::SqliteStore;
use starlog::{Chain, Gateway, GatewayError, StarRequest};

fn request(story: &str) -> StarRequest {
    StarRequest {
        right_ascension: "16h 29m 1.0s".into(),
        declination: "-26° 29' 24.9\"".into(),
        story: story.into(),
    }
}

async fn gateway_over(store: SqliteStore) -> Gateway<SqliteStore> {
    let chain = Arc::new(Chain::open(store).await.unwrap());
    let registry = Arc::new(RequestRegistry::new(RegistryConfig::default()));
    Gateway::new(chain, registry)
}

#[tokio::test]
async fn test_full_registration_flow() {
    let gw = gateway_over(SqliteStore::open_memory().unwrap()).await;
    let wallet = Wallet::generate();
    let address = wallet.address();

    // An unproven address cannot submit and cannot verify out of thin air.
    let err = gw.submit(&address, request("early")).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotAuthorized(_)));
    let err = gw
        .registry()
        .verify_signature(&address, &wallet.sign("anything"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::NoChallenge(_)));

    // Challenge, sign, verify.
    let challenge = gw.registry().request_challenge(&address);
    assert!(challenge.message.ends_with(":starRegistry"));
    assert!(challenge.message.starts_with(address.as_str()));

    let grant = gw
        .registry()
        .verify_signature(&address, &wallet.sign(&challenge.message))
        .unwrap();
    assert!(grant.register_star);
    assert_eq!(grant.status.message_signature, "valid");

    // Submit and read back through every lookup path.
    let story = "Found star using https://www.google.com/sky/";
    let block = gw.submit(&address, request(story)).await.unwrap();
    assert_eq!(block.height, 1);

    let by_height = gw.chain().get_by_height(1).await.unwrap();
    assert_eq!(by_height, block);

    let by_hash = gw
        .chain()
        .get_by_hash(&block.hash.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_hash, block);

    let by_owner = gw.chain().get_by_owner(&address).await.unwrap();
    assert_eq!(by_owner, vec![block.clone()]);
    assert_eq!(
        by_owner[0]
            .star_record()
            .unwrap()
            .star
            .story_decoded()
            .unwrap(),
        story
    );

    // One grant, one star.
    let err = gw.submit(&address, request("again")).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotAuthorized(_)));

    assert!(gw.chain().validate_chain().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_two_wallets_interleaved() {
    let gw = gateway_over(SqliteStore::open_memory().unwrap()).await;
    let alice = Wallet::from_seed(&[0xa1; 32]);
    let bob = Wallet::from_seed(&[0xb0; 32]);

    for (wallet, story) in [(&alice, "alpha"), (&bob, "beta"), (&alice, "gamma")] {
        let address = wallet.address();
        let challenge = gw.registry().request_challenge(&address);
        gw.registry()
            .verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();
        gw.submit(&address, request(story)).await.unwrap();
    }

    let alice_blocks = gw.chain().get_by_owner(&alice.address()).await.unwrap();
    assert_eq!(alice_blocks.len(), 2);
    assert_eq!(alice_blocks[0].height, 1);
    assert_eq!(alice_blocks[1].height, 3);

    let bob_blocks = gw.chain().get_by_owner(&bob.address()).await.unwrap();
    assert_eq!(bob_blocks.len(), 1);
    assert_eq!(bob_blocks[0].height, 2);

    // A signature from the wrong wallet never authorizes.
    let address = alice.address();
    let challenge = gw.registry().request_challenge(&address);
    let err = gw
        .registry()
        .verify_signature(&address, &bob.sign(&challenge.message))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidSignature(_)));
}

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let genesis_hash;
    {
        let gw = gateway_over(SqliteStore::open(&path).unwrap()).await;
        genesis_hash = gw.chain().get_by_height(0).await.unwrap().hash;

        let wallet = Wallet::from_seed(&[0xc3; 32]);
        let address = wallet.address();
        let challenge = gw.registry().request_challenge(&address);
        gw.registry()
            .verify_signature(&address, &wallet.sign(&challenge.message))
            .unwrap();
        gw.submit(&address, request("persisted star")).await.unwrap();
    }

    // Reopen: genesis is not rewritten, the star block is still there, and
    // the chain still audits clean. Registry state is gone by design.
    let gw = gateway_over(SqliteStore::open(&path).unwrap()).await;
    assert_eq!(gw.chain().block_count().await.unwrap(), 2);
    assert_eq!(gw.chain().get_by_height(0).await.unwrap().hash, genesis_hash);

    let block = gw.chain().get_by_height(1).await.unwrap();
    assert_eq!(
        block
            .star_record()
            .unwrap()
            .star
            .story_decoded()
            .unwrap(),
        "persisted star"
    );
    assert!(gw.chain().validate_chain().await.unwrap().is_empty());

    let wallet = Wallet::from_seed(&[0xc3; 32]);
    let err = gw
        .submit(&wallet.address(), request("no grant after restart"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotAuthorized(_)));
}
