use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityResponseData;
use crate::domain::auth::models::LoginCommand;
use crate::inbound::http::middleware::TOKEN_HEADER;
use crate::inbound::http::router::AppState;

/// Verify a username/password pair.
///
/// The issued token travels in the `tokenId` response header; the body carries
/// the caller's identity.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    let authenticated = state.auth_service.login(body.into_command()).await?;

    let token = HeaderValue::from_str(&authenticated.token).map_err(|e| {
        tracing::error!(error = %e, "Issued token is not a valid header value");
        ApiError::internal()
    })?;

    Ok((
        [(TOKEN_HEADER, token)],
        ApiSuccess::new(
            StatusCode::OK,
            IdentityResponseData::from(&authenticated.identity),
        ),
    )
        .into_response())
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl LoginRequest {
    fn into_command(self) -> LoginCommand {
        LoginCommand {
            username: self.username,
            password: self.password,
        }
    }
}
