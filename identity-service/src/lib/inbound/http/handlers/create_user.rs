use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password cannot be empty")]
    EmptyPassword,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        if self.password.is_empty() {
            return Err(ParseCreateUserRequestError::EmptyPassword);
        }

        Ok(CreateUserCommand {
            user: NewUser {
                first_name: self.first_name,
                last_name: self.last_name,
                email: EmailAddress::new(self.email)?,
                username: Username::new(self.username)?,
            },
            password: self.password,
        })
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::validation_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("alice", "alice@example.com", "correct-pw")
            .try_into_command()
            .unwrap();

        assert_eq!(command.user.username.as_str(), "alice");
        assert_eq!(command.user.email.as_str(), "alice@example.com");
        assert_eq!(command.password, "correct-pw");
    }

    #[test]
    fn test_invalid_fields() {
        assert!(matches!(
            request("a", "alice@example.com", "pw").try_into_command(),
            Err(ParseCreateUserRequestError::Username(_))
        ));
        assert!(matches!(
            request("alice", "alice", "pw").try_into_command(),
            Err(ParseCreateUserRequestError::Email(_))
        ));
        assert!(matches!(
            request("alice", "alice@example.com", "").try_into_command(),
            Err(ParseCreateUserRequestError::EmptyPassword)
        ));
    }
}
