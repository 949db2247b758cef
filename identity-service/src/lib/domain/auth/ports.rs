use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Authenticated;
use crate::domain::auth::models::Identity;
use crate::domain::auth::models::LoginCommand;

/// Port for credential verification and token validation.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify a username/password pair and issue a token.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this username
    /// * `CredentialsNotFound` - User exists without a credential record
    /// * `PasswordMismatch` - Password does not match
    /// * `HashingConfiguration` - Password hashing is misconfigured
    /// * `TokenIssuance` - Token could not be signed
    /// * `Store` - User or credential store failed
    async fn login(&self, command: LoginCommand) -> Result<Authenticated, AuthError>;

    /// Resolve the identity behind a token.
    ///
    /// # Errors
    /// * `TokenMissing` - Token is empty
    /// * `TokenMalformed` / `TokenSignatureInvalid` / `TokenExpired` - Token rejected
    /// * `UserNotFound` - Token subject no longer exists
    /// * `Store` - User store failed
    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError>;
}
