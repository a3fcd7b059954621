//! Block: one entry in the hash-chained ledger.
//!
//! A block is immutable once written. Height 0 is the genesis block with a
//! fixed sentinel body; every other block carries a star-registry record.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::CodecError;
use crate::types::{BlockHash, WalletAddress};

/// The fixed genesis body text.
pub const GENESIS_BODY: &str = "First block in the chain - Genesis block";

/// Celestial coordinates plus the owner's story.
///
/// `story` is held in its stored, hex-encoded form; use
/// [`StarCoordinates::story_decoded`] to read the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarCoordinates {
    /// Right ascension, free text (e.g. `"16h 29m 1.0s"`).
    pub right_ascension: String,

    /// Declination, free text (e.g. `"-26° 29' 24.9\""`).
    pub declination: String,

    /// The story, hex-encoded.
    pub story: String,
}

impl StarCoordinates {
    /// Decode the stored story back to its original text.
    pub fn story_decoded(&self) -> Result<String, CodecError> {
        codec::decode_story(&self.story)
    }
}

/// The payload of a non-genesis block: a star tied to a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// The wallet address that proved ownership before submitting.
    pub owner: WalletAddress,

    /// The registered star.
    pub star: StarCoordinates,
}

/// The body of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockBody {
    /// The fixed sentinel body of height 0.
    Genesis,
    /// A star-registry record.
    Star(StarRecord),
}

/// One entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Dense, strictly increasing position; 0 is genesis.
    pub height: u64,

    /// Seconds since epoch, set at append time.
    pub timestamp: i64,

    /// Digest of the block at `height - 1`; `None` only for genesis.
    pub previous_hash: Option<BlockHash>,

    /// Digest of this block's canonical encoding with this field held
    /// empty during computation. `None` only while the block is being
    /// built; always `Some` once stored.
    pub hash: Option<BlockHash>,

    /// The payload.
    pub body: BlockBody,
}

impl Block {
    /// Build and seal the genesis block.
    pub fn genesis(timestamp: i64) -> Self {
        let mut block = Self {
            height: 0,
            timestamp,
            previous_hash: None,
            hash: None,
            body: BlockBody::Genesis,
        };
        block.hash = Some(block.compute_hash());
        block
    }

    /// Build and seal a star block on top of the given head.
    pub fn next(height: u64, timestamp: i64, previous_hash: BlockHash, record: StarRecord) -> Self {
        let mut block = Self {
            height,
            timestamp,
            previous_hash: Some(previous_hash),
            hash: None,
            body: BlockBody::Star(record),
        };
        block.hash = Some(block.compute_hash());
        block
    }

    /// Compute this block's digest: Blake3 over the canonical encoding with
    /// the hash field held empty.
    pub fn compute_hash(&self) -> BlockHash {
        BlockHash::compute(&codec::hash_input_bytes(self))
    }

    /// Whether the stored hash matches a fresh recomputation.
    pub fn hash_is_valid(&self) -> bool {
        self.hash == Some(self.compute_hash())
    }

    /// The owner address, if this is a star block.
    pub fn owner(&self) -> Option<&WalletAddress> {
        match &self.body {
            BlockBody::Star(record) => Some(&record.owner),
            BlockBody::Genesis => None,
        }
    }

    /// The star record, if this is a star block.
    pub fn star_record(&self) -> Option<&StarRecord> {
        match &self.body {
            BlockBody::Star(record) => Some(record),
            BlockBody::Genesis => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_story;

    fn sample_record(owner: &str) -> StarRecord {
        StarRecord {
            owner: WalletAddress::from(owner),
            star: StarCoordinates {
                right_ascension: "16h 29m 1.0s".into(),
                declination: "-26° 29' 24.9\"".into(),
                story: encode_story("Found star using https://www.google.com/sky/"),
            },
        }
    }

    #[test]
    fn test_genesis_is_sealed() {
        let genesis = Block::genesis(1_700_000_000);
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.previous_hash, None);
        assert!(genesis.hash.is_some());
        assert!(genesis.hash_is_valid());
        assert_eq!(genesis.body, BlockBody::Genesis);
    }

    #[test]
    fn test_next_links_to_previous() {
        let genesis = Block::genesis(1_700_000_000);
        let prev = genesis.hash.unwrap();
        let block = Block::next(1, 1_700_000_010, prev, sample_record("addr1"));

        assert_eq!(block.height, 1);
        assert_eq!(block.previous_hash, Some(prev));
        assert!(block.hash_is_valid());
        assert_eq!(block.owner().unwrap().as_str(), "addr1");
    }

    #[test]
    fn test_tampering_invalidates_hash() {
        let genesis = Block::genesis(1_700_000_000);
        let mut block = Block::next(
            1,
            1_700_000_010,
            genesis.hash.unwrap(),
            sample_record("addr1"),
        );

        block.timestamp += 1;
        assert!(!block.hash_is_valid());
    }

    #[test]
    fn test_hash_ignores_stored_hash_field() {
        // The digest is computed with the hash field held empty, so sealing
        // must not change what compute_hash returns.
        let mut block = Block::genesis(1_700_000_000);
        let sealed = block.compute_hash();
        block.hash = None;
        assert_eq!(block.compute_hash(), sealed);
    }

    #[test]
    fn test_story_decoded_roundtrip() {
        let record = sample_record("addr1");
        assert_eq!(
            record.star.story_decoded().unwrap(),
            "Found star using https://www.google.com/sky/"
        );
    }
}
