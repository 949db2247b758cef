use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::user::errors::UserError;
use crate::user::ports::CredentialRepository;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user management.
///
/// Keeps each user and their credential record in step.
pub struct UserService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    users: Arc<UR>,
    credentials: Arc<CR>,
    password_hasher: PasswordHasher,
}

impl<UR, CR> UserService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `credentials` - Credential persistence implementation
    /// * `password_hasher` - Hasher used for new and changed passwords
    pub fn new(users: Arc<UR>, credentials: Arc<CR>, password_hasher: PasswordHasher) -> Self {
        Self {
            users,
            credentials,
            password_hasher,
        }
    }
}

#[async_trait]
impl<UR, CR> UserServicePort for UserService<UR, CR>
where
    UR: UserRepository,
    CR: CredentialRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        // Hash first so a misconfigured hasher never leaves a user without credentials
        let salted = self.password_hasher.hash_with_new_salt(&command.password)?;

        let user = self.users.create(command.user).await?;

        if let Err(e) = self
            .credentials
            .create(StoredCredential::new(user.id, salted))
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "Credentials insert failed, removing user");
            if let Err(rollback) = self.users.delete(&user.id).await {
                tracing::error!(
                    user_id = %user.id,
                    error = %rollback,
                    "Failed to remove user after credentials insert failure"
                );
            }
            return Err(UserError::InsertFailed(
                "Credentials insert failed".to_string(),
            ));
        }

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn find_user(&self, query: &UserQuery) -> Result<User, UserError> {
        let (user, criterion) = match query {
            UserQuery::ById(id) => (self.users.find_by_id(id).await?, format!("id={}", id)),
            UserQuery::ByUsername(username) => (
                self.users.find_by_username(username).await?,
                format!("username={}", username),
            ),
            UserQuery::ByEmail(email) => (
                self.users.find_by_email(email).await?,
                format!("email={}", email),
            ),
        };

        user.ok_or(UserError::NotFound(criterion))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        let new_credential = match &command.password {
            Some(password) => {
                if self.credentials.find_by_owner_id(id).await?.is_none() {
                    tracing::error!(user_id = %id, "User has no credentials record");
                    return Err(UserError::CredentialsNotFound(id.to_string()));
                }
                let salted = self.password_hasher.hash_with_new_salt(password)?;
                Some(StoredCredential::new(*id, salted))
            }
            None => None,
        };

        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }

        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }

        if let Some(email) = command.email {
            user.email = email;
        }

        let updated_user = self.users.update(user).await?;

        if let Some(credential) = new_credential {
            self.credentials.update(credential).await?;
            tracing::info!(user_id = %id, "Password changed");
        }

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if self.credentials.find_by_owner_id(id).await?.is_none() {
            tracing::error!(user_id = %id, "User has no credentials record");
            return Err(UserError::CredentialsNotFound(id.to_string()));
        }

        self.credentials.delete_by_owner_id(id).await?;
        self.users.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
