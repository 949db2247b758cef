use auth::TokenError;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthFailureReason;
use crate::domain::auth::models::Identity;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod find_user;
pub mod login;
pub mod update_user;
pub mod validate_token;

const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure rendered as `{timestamp, status, error, message}`.
///
/// `error` is the stable tag clients branch on; `message` is human readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn bad_parameter(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BadParameter", message)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ValidationFailed", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn invalid_token() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "InvalidToken", INVALID_TOKEN_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            INTERNAL_ERROR_MESSAGE,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &'static str {
        self.error
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.error,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: &'static str,
    pub message: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_parameter(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_parameter(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_parameter(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        ApiError::invalid_token()
    }
}

impl From<AuthFailureReason> for ApiError {
    fn from(reason: AuthFailureReason) -> Self {
        match reason {
            AuthFailureReason::UserNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "UserNotFound", reason.to_string())
            }
            AuthFailureReason::CredentialsNotFound => ApiError::new(
                StatusCode::NOT_FOUND,
                "CredentialsNotFound",
                reason.to_string(),
            ),
            AuthFailureReason::PasswordMismatch => {
                ApiError::new(StatusCode::BAD_REQUEST, "BadCredentials", reason.to_string())
            }
            AuthFailureReason::TokenMissing => ApiError::bad_parameter(reason.to_string()),
            AuthFailureReason::TokenMalformed
            | AuthFailureReason::TokenExpired
            | AuthFailureReason::TokenSignatureInvalid => ApiError::invalid_token(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(reason) => ApiError::from(reason),
            AuthError::HashingConfiguration(e) => {
                tracing::error!(error = %e, "Password hashing configuration failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "HashingConfigurationFailure",
                    "Password hashing is misconfigured",
                )
            }
            AuthError::TokenIssuance(e) | AuthError::Store(e) => {
                tracing::error!(error = %e, "Authentication failed on an internal error");
                ApiError::internal()
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "UserNotFound", err.to_string())
            }
            UserError::CredentialsNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "CredentialsNotFound", err.to_string())
            }
            UserError::UsernameAlreadyExists(_)
            | UserError::EmailAlreadyExists(_)
            | UserError::InsertFailed(_) => {
                ApiError::new(StatusCode::CONFLICT, "InsertFailed", err.to_string())
            }
            UserError::InvalidUsername(_) | UserError::InvalidEmail(_) => {
                ApiError::validation_failed(err.to_string())
            }
            UserError::BadParameter(_) => ApiError::bad_parameter(err.to_string()),
            UserError::Password(e) => {
                tracing::error!(error = %e, "Password hashing configuration failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "HashingConfigurationFailure",
                    "Password hashing is misconfigured",
                )
            }
            UserError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database operation failed");
                ApiError::internal()
            }
        }
    }
}

/// Caller identity as returned by login and token validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResponseData {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&Identity> for IdentityResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.subject_id,
            username: identity.display_name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Public user profile. Credentials are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
        }
    }
}
