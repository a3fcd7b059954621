//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starlog_core::{
    codec::encode_story, BlockHash, StarCoordinates, StarRecord, Wallet, WalletAddress,
    MAX_STORY_BYTES,
};

/// Generate a random wallet.
pub fn wallet() -> impl Strategy<Value = Wallet> {
    any::<[u8; 32]>().prop_map(|seed| Wallet::from_seed(&seed))
}

/// Generate a random wallet address.
pub fn address() -> impl Strategy<Value = WalletAddress> {
    wallet().prop_map(|w| w.address())
}

/// Generate a random block hash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a printable-ASCII story within every content limit.
pub fn story() -> impl Strategy<Value = String> {
    "[ -~]{1,250}".prop_map(String::from)
}

/// Generate a story that violates the byte limit.
pub fn overlong_story() -> impl Strategy<Value = String> {
    ((MAX_STORY_BYTES + 1)..=(MAX_STORY_BYTES * 2))
        .prop_map(|len| "x".repeat(len))
}

/// Generate free-text celestial coordinates.
pub fn coordinates() -> impl Strategy<Value = (String, String)> {
    (
        (0u8..24, 0u8..60, 0u16..600).prop_map(|(h, m, s)| {
            format!("{h}h {m}m {}.{}s", s / 10, s % 10)
        }),
        (-89i8..=89, 0u8..60, 0u16..600).prop_map(|(d, m, s)| {
            format!("{d}° {m}' {}.{}\"", s / 10, s % 10)
        }),
    )
}

/// Generate a complete star record with a hex-encoded story.
pub fn star_record() -> impl Strategy<Value = StarRecord> {
    (address(), coordinates(), story()).prop_map(|(owner, (ra, dec), story)| StarRecord {
        owner,
        star: StarCoordinates {
            right_ascension: ra,
            declination: dec,
            story: encode_story(&story),
        },
    })
}

/// Generate a reasonable unix timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    1_500_000_000i64..=4_000_000_000i64
}

/// Generate a non-genesis block height.
pub fn height() -> impl Strategy<Value = u64> {
    1u64..=100_000u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlog_core::{story::validate_story, Block};

    proptest! {
        #[test]
        fn generated_stories_pass_validation(s in story()) {
            prop_assert!(validate_story(&s).is_ok());
        }

        #[test]
        fn overlong_stories_fail_validation(s in overlong_story()) {
            prop_assert!(validate_story(&s).is_err());
        }

        #[test]
        fn generated_records_seal_into_valid_blocks(
            record in star_record(),
            h in height(),
            ts in timestamp(),
            prev in block_hash(),
        ) {
            let block = Block::next(h, ts, prev, record);
            prop_assert!(block.hash_is_valid());
        }
    }
}
