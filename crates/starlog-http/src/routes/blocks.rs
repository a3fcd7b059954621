use axum::{extract::Path, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use starlog::{GatewayError, StarRequest, WalletAddress};

use crate::routes::{chain_error, BlockDto};
use crate::state::SharedState;

/// `GET /block/:height`
///
/// Returns the block at a height, story decoded, or a 404 message.
pub async fn get_block(
    State(state): State<SharedState>,
    Path(height): Path<u64>,
) -> Result<Json<BlockDto>, (StatusCode, String)> {
    let block = state
        .gateway
        .chain()
        .get_by_height(height)
        .await
        .map_err(chain_error)?;
    Ok(Json(BlockDto::from(&block)))
}

/// Request body for `POST /block`.
#[derive(Debug, Deserialize)]
pub struct SubmitBlockRequest {
    /// The wallet address that completed the validation flow.
    pub address: String,
    /// The star to register.
    pub star: StarDto,
}

/// Incoming star coordinates, story in plain text.
#[derive(Debug, Deserialize)]
pub struct StarDto {
    #[serde(alias = "right_ascension")]
    pub ra: String,
    #[serde(alias = "declination")]
    pub dec: String,
    pub story: String,
}

/// `POST /block`
///
/// Registers a star for an authorized address. One verified challenge buys
/// exactly one block.
pub async fn submit_block(
    State(state): State<SharedState>,
    Json(body): Json<SubmitBlockRequest>,
) -> Result<(StatusCode, Json<BlockDto>), (StatusCode, String)> {
    let address = WalletAddress::from(body.address);
    let request = StarRequest {
        right_ascension: body.star.ra,
        declination: body.star.dec,
        story: body.star.story,
    };

    let block = state
        .gateway
        .submit(&address, request)
        .await
        .map_err(gateway_error)?;

    Ok((StatusCode::CREATED, Json(BlockDto::from(&block))))
}

fn gateway_error(err: GatewayError) -> (StatusCode, String) {
    match err {
        GatewayError::NotAuthorized(_) => (StatusCode::UNAUTHORIZED, err.to_string()),
        GatewayError::InvalidPayload(_) | GatewayError::InvalidStory(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        GatewayError::Chain(inner) => chain_error(inner),
    }
}
