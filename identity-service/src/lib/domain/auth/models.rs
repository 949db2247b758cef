use serde::Serialize;

use crate::domain::user::models::User;

/// Authenticated caller, as returned by login and token validation.
///
/// Never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub subject_id: i64,
    pub display_name: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.id.0,
            display_name: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Successful login: the caller's identity and a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub identity: Identity,
    pub token: String,
}

/// Login attempt with raw user input.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}
