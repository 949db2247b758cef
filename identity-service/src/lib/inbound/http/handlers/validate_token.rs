use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityResponseData;
use crate::inbound::http::router::AppState;

/// Resolve the identity behind a token presented in the body.
pub async fn validate_token(
    State(state): State<AppState>,
    body: Result<Json<ValidateTokenRequest>, JsonRejection>,
) -> Result<ApiSuccess<IdentityResponseData>, ApiError> {
    let Json(body) = body?;
    let token = body.token.unwrap_or_default();

    state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

/// HTTP request body for token validation (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    token: Option<String>,
}
