//! Route handlers and the JSON shapes they serve.

pub mod blocks;
pub mod health;
pub mod stars;
pub mod validation;

use axum::http::StatusCode;
use serde::Serialize;

use starlog::core::GENESIS_BODY;
use starlog::{Block, BlockBody, ChainError};

/// JSON rendering of a stored star, with the story decoded alongside its
/// stored hex form.
#[derive(Debug, Serialize)]
pub struct StarDto {
    pub right_ascension: String,
    pub declination: String,
    pub story: String,
    #[serde(rename = "storyDecoded", skip_serializing_if = "Option::is_none")]
    pub story_decoded: Option<String>,
}

/// JSON rendering of a block body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BodyDto {
    Genesis(&'static str),
    Star { owner: String, star: StarDto },
}

/// JSON rendering of a ledger block.
#[derive(Debug, Serialize)]
pub struct BlockDto {
    pub height: u64,
    pub timestamp: i64,
    #[serde(rename = "previousHash")]
    pub previous_hash: Option<String>,
    pub hash: Option<String>,
    pub body: BodyDto,
}

impl From<&Block> for BlockDto {
    fn from(block: &Block) -> Self {
        let body = match &block.body {
            BlockBody::Genesis => BodyDto::Genesis(GENESIS_BODY),
            BlockBody::Star(record) => BodyDto::Star {
                owner: record.owner.as_str().to_owned(),
                star: StarDto {
                    right_ascension: record.star.right_ascension.clone(),
                    declination: record.star.declination.clone(),
                    story: record.star.story.clone(),
                    story_decoded: record.star.story_decoded().ok(),
                },
            },
        };
        Self {
            height: block.height,
            timestamp: block.timestamp,
            previous_hash: block.previous_hash.map(|h| h.to_hex()),
            hash: block.hash.map(|h| h.to_hex()),
            body,
        }
    }
}

/// Map a chain error onto an HTTP status and message.
pub(crate) fn chain_error(err: ChainError) -> (StatusCode, String) {
    match err {
        ChainError::NotFound(height) => {
            (StatusCode::NOT_FOUND, format!("no block at height {height}"))
        }
        other => {
            tracing::error!(error = %other, "chain operation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
