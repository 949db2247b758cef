use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Default token validity (about 5.5 hours).
pub const DEFAULT_VALIDITY_MILLIS: i64 = 20_000_000;

/// Process-wide token issuance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub validity_millis: i64,
}

impl TokenSettings {
    pub fn new(issuer: impl ToString, audience: impl ToString, validity_millis: i64) -> Self {
        Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            validity_millis,
        }
    }
}

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds the read-only key material and parameters established at startup.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_settings: TokenSettings,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `password_hasher` - Configured password hasher
    /// * `token_settings` - Issuer, audience and validity used for issued tokens
    pub fn new(
        token_secret: &[u8],
        password_hasher: PasswordHasher,
        token_settings: TokenSettings,
    ) -> Self {
        Self {
            password_hasher,
            token_codec: TokenCodec::new(token_secret),
            token_settings,
        }
    }

    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `salt` - Stored salt
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Stringified subject identifier to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password could not be hashed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        salt: &[u8],
        stored_hash: &[u8],
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, salt, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token for the subject with the configured settings.
    pub fn issue_token(&self, subject: &str) -> Result<String, TokenError> {
        self.token_codec.issue(
            subject,
            &self.token_settings.issuer,
            &self.token_settings.audience,
            self.token_settings.validity_millis,
        )
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, tampered with, or expired
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_codec.verify(token)
    }
}
