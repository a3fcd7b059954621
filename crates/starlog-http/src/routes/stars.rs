use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use starlog::{BlockHash, WalletAddress};

use crate::routes::{chain_error, BlockDto};
use crate::state::SharedState;

/// `GET /stars/:selector`
///
/// Two lookup forms share this path, keeping the original route shapes:
///
/// - `hash:<hex>` returns the single matching block or 404
/// - `address:<addr>` returns every block owned by the address, oldest
///   first, possibly empty
pub async fn get_stars(
    State(state): State<SharedState>,
    Path(selector): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let chain = state.gateway.chain();

    if let Some(hex) = selector.strip_prefix("hash:") {
        let hash = BlockHash::from_hex(hex)
            .map_err(|_| (StatusCode::BAD_REQUEST, "malformed block hash".to_string()))?;
        return match chain.get_by_hash(&hash).await.map_err(chain_error)? {
            Some(block) => Ok(Json(BlockDto::from(&block)).into_response()),
            None => Err((
                StatusCode::NOT_FOUND,
                format!("no block with hash {hex}"),
            )),
        };
    }

    if let Some(addr) = selector.strip_prefix("address:") {
        let owner = WalletAddress::from(addr);
        let blocks = chain.get_by_owner(&owner).await.map_err(chain_error)?;
        let dtos: Vec<BlockDto> = blocks.iter().map(BlockDto::from).collect();
        return Ok(Json(dtos).into_response());
    }

    Err((
        StatusCode::BAD_REQUEST,
        "expected hash:<hex> or address:<address>".to_string(),
    ))
}
