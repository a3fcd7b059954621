//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 seconds)
//!
//! The canonical encoding is critical twice over: the same bytes are used
//! both as the stored form of a block and, with the hash field forced to
//! null, as the input to the block digest. Identical field values must
//! produce identical bytes on every platform.

use ciborium::value::Value;

use crate::block::{Block, BlockBody, StarCoordinates, StarRecord};
use crate::error::CodecError;
use crate::types::{BlockHash, WalletAddress};

/// Block field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREV_HASH: u64 = 2;
    pub const BODY: u64 = 3;
    pub const HASH: u64 = 4;

    // Star body map keys.
    pub const OWNER: u64 = 0;
    pub const RIGHT_ASCENSION: u64 = 1;
    pub const DECLINATION: u64 = 2;
    pub const STORY: u64 = 3;
}

/// Encode a block to canonical CBOR bytes (stored form).
pub fn encode_block(block: &Block) -> Vec<u8> {
    let value = block_to_cbor_value(block, true);
    encode_cbor_value_canonical(&value)
}

/// Encode a block for hashing: the canonical encoding with the hash field
/// forced to null.
pub fn hash_input_bytes(block: &Block) -> Vec<u8> {
    let value = block_to_cbor_value(block, false);
    encode_cbor_value_canonical(&value)
}

/// Hex-encode a story for storage. Lossless and reversible.
pub fn encode_story(story: &str) -> String {
    hex::encode(story.as_bytes())
}

/// Decode a stored story back to its exact original text.
pub fn decode_story(encoded: &str) -> Result<String, CodecError> {
    let bytes = hex::decode(encoded).map_err(|e| CodecError::CorruptStory(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodecError::CorruptStory(e.to_string()))
}

/// Convert a block to a CBOR Value (map with integer keys).
///
/// With `include_hash` false the hash entry is encoded as null, which is
/// the hash-input form.
fn block_to_cbor_value(block: &Block, include_hash: bool) -> Value {
    let mut entries = Vec::with_capacity(5);

    entries.push((
        Value::Integer(keys::HEIGHT.into()),
        Value::Integer(block.height.into()),
    ));
    entries.push((
        Value::Integer(keys::TIMESTAMP.into()),
        Value::Integer(block.timestamp.into()),
    ));

    let prev_value = match &block.previous_hash {
        Some(hash) => Value::Bytes(hash.0.to_vec()),
        None => Value::Null,
    };
    entries.push((Value::Integer(keys::PREV_HASH.into()), prev_value));

    entries.push((Value::Integer(keys::BODY.into()), body_to_cbor_value(&block.body)));

    let hash_value = match (&block.hash, include_hash) {
        (Some(hash), true) => Value::Bytes(hash.0.to_vec()),
        _ => Value::Null,
    };
    entries.push((Value::Integer(keys::HASH.into()), hash_value));

    Value::Map(entries)
}

fn body_to_cbor_value(body: &BlockBody) -> Value {
    match body {
        // The genesis body is a fixed text sentinel, matching the shape of
        // the original free-text body field.
        BlockBody::Genesis => Value::Text(crate::block::GENESIS_BODY.to_string()),
        BlockBody::Star(record) => {
            let entries = vec![
                (
                    Value::Integer(keys::OWNER.into()),
                    Value::Text(record.owner.as_str().to_string()),
                ),
                (
                    Value::Integer(keys::RIGHT_ASCENSION.into()),
                    Value::Text(record.star.right_ascension.clone()),
                ),
                (
                    Value::Integer(keys::DECLINATION.into()),
                    Value::Text(record.star.declination.clone()),
                ),
                (
                    Value::Integer(keys::STORY.into()),
                    Value::Text(record.star.story.clone()),
                ),
            ];
            Value::Map(entries)
        }
    }
}

/// Encode a CBOR Value to canonical bytes.
fn encode_cbor_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Null => buf.push(0xf6),
        _ => unreachable!("value type not used by the block encoding"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n = i128::from(i);

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type, smallest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

/// Decode a block from canonical bytes.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CodecError> {
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| CodecError::Corrupt(e.to_string()))?;
    cbor_value_to_block(&value)
}

/// Helper to get a map value by integer key.
fn get<'a>(map: &'a [(Value, Value)], key: u64) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
        .map(|(_, v)| v)
}

fn hash_from_bytes(b: &[u8], field: &str) -> Result<BlockHash, CodecError> {
    let arr: [u8; 32] = b
        .try_into()
        .map_err(|_| CodecError::Corrupt(format!("{field} must be 32 bytes")))?;
    Ok(BlockHash(arr))
}

fn cbor_value_to_block(value: &Value) -> Result<Block, CodecError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CodecError::Corrupt("expected map".into())),
    };

    let height = match get(map, keys::HEIGHT) {
        Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
            .map_err(|_| CodecError::Corrupt("height out of range".into()))?,
        _ => return Err(CodecError::Corrupt("missing height".into())),
    };

    let timestamp = match get(map, keys::TIMESTAMP) {
        Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
            .map_err(|_| CodecError::Corrupt("timestamp out of range".into()))?,
        _ => return Err(CodecError::Corrupt("missing timestamp".into())),
    };

    let previous_hash = match get(map, keys::PREV_HASH) {
        Some(Value::Bytes(b)) => Some(hash_from_bytes(b, "previous_hash")?),
        Some(Value::Null) | None => None,
        _ => return Err(CodecError::Corrupt("invalid previous_hash".into())),
    };

    let body = match get(map, keys::BODY) {
        Some(v) => cbor_value_to_body(v)?,
        None => return Err(CodecError::Corrupt("missing body".into())),
    };

    let hash = match get(map, keys::HASH) {
        Some(Value::Bytes(b)) => Some(hash_from_bytes(b, "hash")?),
        Some(Value::Null) | None => None,
        _ => return Err(CodecError::Corrupt("invalid hash".into())),
    };

    Ok(Block {
        height,
        timestamp,
        previous_hash,
        hash,
        body,
    })
}

fn cbor_value_to_body(value: &Value) -> Result<BlockBody, CodecError> {
    match value {
        Value::Text(s) if s == crate::block::GENESIS_BODY => Ok(BlockBody::Genesis),
        Value::Text(_) => Err(CodecError::Corrupt("unexpected text body".into())),
        Value::Map(map) => {
            let text = |key: u64, field: &str| -> Result<String, CodecError> {
                match get(map, key) {
                    Some(Value::Text(s)) => Ok(s.clone()),
                    _ => Err(CodecError::Corrupt(format!("missing {field}"))),
                }
            };

            Ok(BlockBody::Star(StarRecord {
                owner: WalletAddress::new(text(keys::OWNER, "owner")?),
                star: StarCoordinates {
                    right_ascension: text(keys::RIGHT_ASCENSION, "right_ascension")?,
                    declination: text(keys::DECLINATION, "declination")?,
                    story: text(keys::STORY, "story")?,
                },
            }))
        }
        _ => Err(CodecError::Corrupt("invalid body".into())),
    }
}
