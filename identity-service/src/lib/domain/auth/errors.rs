use auth::TokenError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Why an authentication attempt was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthFailureReason {
    #[error("System user not found")]
    UserNotFound,

    #[error("Credentials not found")]
    CredentialsNotFound,

    #[error("Invalid credentials")]
    PasswordMismatch,

    #[error("Token cannot be empty")]
    TokenMissing,

    #[error("Token is malformed")]
    TokenMalformed,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    TokenSignatureInvalid,
}

impl From<&TokenError> for AuthFailureReason {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::Expired => AuthFailureReason::TokenExpired,
            TokenError::SignatureInvalid => AuthFailureReason::TokenSignatureInvalid,
            TokenError::Malformed(_) | TokenError::EncodingFailed(_) => {
                AuthFailureReason::TokenMalformed
            }
        }
    }
}

/// Top-level error for login and token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(AuthFailureReason),

    /// Password hashing parameters or stored salt are unusable.
    #[error("Password hashing is misconfigured: {0}")]
    HashingConfiguration(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    /// User or credential store failed; never reported as a missing user.
    #[error("Store error: {0}")]
    Store(String),
}

impl AuthError {
    pub fn reason(&self) -> Option<AuthFailureReason> {
        match self {
            AuthError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<AuthFailureReason> for AuthError {
    fn from(reason: AuthFailureReason) -> Self {
        AuthError::Rejected(reason)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Rejected(AuthFailureReason::from(&err))
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AuthError::Rejected(AuthFailureReason::UserNotFound),
            UserError::CredentialsNotFound(_) => {
                AuthError::Rejected(AuthFailureReason::CredentialsNotFound)
            }
            UserError::Password(e) => AuthError::HashingConfiguration(e.to_string()),
            other => AuthError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_reasons() {
        assert_eq!(
            AuthError::from(TokenError::Expired).reason(),
            Some(AuthFailureReason::TokenExpired)
        );
        assert_eq!(
            AuthError::from(TokenError::SignatureInvalid).reason(),
            Some(AuthFailureReason::TokenSignatureInvalid)
        );
        assert_eq!(
            AuthError::from(TokenError::Malformed("bad".to_string())).reason(),
            Some(AuthFailureReason::TokenMalformed)
        );
    }

    #[test]
    fn test_store_failure_is_not_user_not_found() {
        let err = AuthError::from(UserError::DatabaseError("timeout".to_string()));
        assert!(matches!(err, AuthError::Store(_)));
        assert_eq!(err.reason(), None);
    }
}
