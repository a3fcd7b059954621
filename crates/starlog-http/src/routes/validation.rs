use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use starlog::registry::{AuthorizationGrant, RegistryError, ValidationChallenge};
use starlog::WalletAddress;

use crate::state::SharedState;

/// Request body for `POST /requestValidation`.
#[derive(Debug, Deserialize)]
pub struct RequestValidationBody {
    pub address: String,
}

/// `POST /requestValidation`
///
/// Issues (or refreshes) the address's validation challenge.
pub async fn request_validation(
    State(state): State<SharedState>,
    Json(body): Json<RequestValidationBody>,
) -> Result<Json<ValidationChallenge>, (StatusCode, String)> {
    if body.address.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "address is empty".to_string()));
    }

    let address = WalletAddress::from(body.address);
    let challenge = state.gateway.registry().request_challenge(&address);
    Ok(Json(challenge))
}

/// Request body for `POST /message-signature/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateSignatureBody {
    pub address: String,
    pub signature: String,
}

/// `POST /message-signature/validate`
///
/// Checks the signature against the address's live challenge. Success
/// grants one star submission.
pub async fn validate_signature(
    State(state): State<SharedState>,
    Json(body): Json<ValidateSignatureBody>,
) -> Result<Json<AuthorizationGrant>, (StatusCode, String)> {
    let address = WalletAddress::from(body.address);
    let grant = state
        .gateway
        .registry()
        .verify_signature(&address, &body.signature)
        .map_err(registry_error)?;
    Ok(Json(grant))
}

fn registry_error(err: RegistryError) -> (StatusCode, String) {
    match err {
        RegistryError::NoChallenge(_) | RegistryError::InvalidSignature(_) => {
            (StatusCode::UNAUTHORIZED, err.to_string())
        }
    }
}
