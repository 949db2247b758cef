use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthFailureReason;
use crate::domain::auth::models::Authenticated;
use crate::domain::auth::models::Identity;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::ports::CredentialRepository;
use crate::user::ports::UserRepository;

/// Credential verifier.
///
/// Resolves users and their stored credentials through the repository ports
/// and delegates hashing and token work to the shared [`Authenticator`].
pub struct AuthService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    users: Arc<UR>,
    credentials: Arc<CR>,
    authenticator: Arc<Authenticator>,
}

impl<UR, CR> AuthService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    pub fn new(users: Arc<UR>, credentials: Arc<CR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            credentials,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR, CR> AuthServicePort for AuthService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<Authenticated, AuthError> {
        // A username that fails validation cannot belong to any stored user
        let Ok(username) = Username::new(command.username) else {
            return Err(AuthFailureReason::UserNotFound.into());
        };

        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(AuthFailureReason::UserNotFound)?;

        let credential = match self.credentials.find_by_owner_id(&user.id).await? {
            Some(credential) => credential,
            None => {
                tracing::error!(user_id = %user.id, "User has no credentials record");
                return Err(AuthFailureReason::CredentialsNotFound.into());
            }
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &credential.salt,
                &credential.hash,
                &user.id.to_string(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(user_id = %user.id, "Login rejected: password mismatch");
                    AuthError::Rejected(AuthFailureReason::PasswordMismatch)
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(error = %err, "Password hashing failed during login");
                    AuthError::HashingConfiguration(err.to_string())
                }
                AuthenticationError::TokenError(err) => {
                    tracing::error!(error = %err, "Token issuance failed during login");
                    AuthError::TokenIssuance(err.to_string())
                }
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User successfully logged in");

        Ok(Authenticated {
            identity: Identity::from(&user),
            token: result.access_token,
        })
    }

    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthFailureReason::TokenMissing.into());
        }

        let claims = self.authenticator.verify_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::from(e)
        })?;

        let user_id = UserId::parse(&claims.sub).ok_or(AuthFailureReason::TokenMalformed)?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthFailureReason::UserNotFound)?;

        Ok(Identity::from(&user))
    }
}
