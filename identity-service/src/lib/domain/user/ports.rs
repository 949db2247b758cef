use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user together with their salted credential.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `InsertFailed` - Credential could not be stored (the user is rolled back)
    /// * `Password` - Password hashing is misconfigured
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve a user by a single criterion.
    ///
    /// # Errors
    /// * `NotFound` - No user matches the criterion
    /// * `DatabaseError` - Database operation failed
    async fn find_user(&self, query: &UserQuery) -> Result<User, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `CredentialsNotFound` - A new password was given but the user has no credential
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete a user and their credential.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `CredentialsNotFound` - User has no credential
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns the identifier.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username (None if not found).
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for stored credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Persist the credential of a user.
    ///
    /// # Errors
    /// * `InsertFailed` - The owner already has a credential or does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, credential: StoredCredential) -> Result<StoredCredential, UserError>;

    /// Retrieve the credential of a user (None if not found).
    async fn find_by_owner_id(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<StoredCredential>, UserError>;

    /// Replace hash and salt of an existing credential.
    ///
    /// # Errors
    /// * `CredentialsNotFound` - The owner has no credential
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, credential: StoredCredential) -> Result<StoredCredential, UserError>;

    /// Remove the credential of a user.
    ///
    /// # Errors
    /// * `CredentialsNotFound` - The owner has no credential
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_owner_id(&self, owner_id: &UserId) -> Result<(), UserError>;
}
