use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialRepository;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store used when no database is configured.
///
/// Identifiers are assigned sequentially from 1 and never reused.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

#[derive(Default)]
struct UserTable {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl UserTable {
    fn check_unique(
        &self,
        id: Option<UserId>,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<(), UserError> {
        let others = self.users.values().filter(|u| Some(u.id) != id);
        for other in others {
            if other.username == *username {
                return Err(UserError::UsernameAlreadyExists(
                    username.as_str().to_string(),
                ));
            }
            if other.email == *email {
                return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
            }
        }
        Ok(())
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.table.write().await;
        table.check_unique(None, &user.username, &user.email)?;

        table.last_id += 1;
        let user = User {
            id: UserId(table.last_id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
        };
        table.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table
            .users
            .values()
            .find(|u| u.username == *username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table.users.values().find(|u| u.email == *email).cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.write().await;
        if !table.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        table.check_unique(Some(user.id), &user.username, &user.email)?;
        table.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.table
            .write()
            .await
            .users
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// Process-local credential store, keyed by owner.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    credentials: RwLock<HashMap<UserId, StoredCredential>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn create(&self, credential: StoredCredential) -> Result<StoredCredential, UserError> {
        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&credential.owner_id) {
            return Err(UserError::InsertFailed(format!(
                "Credentials insert failed for user {}",
                credential.owner_id
            )));
        }
        credentials.insert(credential.owner_id, credential.clone());

        Ok(credential)
    }

    async fn find_by_owner_id(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<StoredCredential>, UserError> {
        Ok(self.credentials.read().await.get(owner_id).cloned())
    }

    async fn update(&self, credential: StoredCredential) -> Result<StoredCredential, UserError> {
        let mut credentials = self.credentials.write().await;
        match credentials.get_mut(&credential.owner_id) {
            Some(stored) => {
                *stored = credential.clone();
                Ok(credential)
            }
            None => Err(UserError::CredentialsNotFound(
                credential.owner_id.to_string(),
            )),
        }
    }

    async fn delete_by_owner_id(&self, owner_id: &UserId) -> Result<(), UserError> {
        self.credentials
            .write()
            .await
            .remove(owner_id)
            .map(|_| ())
            .ok_or(UserError::CredentialsNotFound(owner_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            username: Username::new(username.to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let repository = InMemoryUserRepository::new();

        let alice = repository
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = repository
            .create(new_user("bob", "bob@example.com"))
            .await
            .unwrap();

        assert_eq!(alice.id, UserId(1));
        assert_eq!(bob.id, UserId(2));
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let same_username = repository
            .create(new_user("alice", "other@example.com"))
            .await;
        let same_email = repository
            .create(new_user("alice2", "alice@example.com"))
            .await;

        assert!(matches!(
            same_username,
            Err(UserError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(same_email, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_lookup_by_each_criterion() {
        let repository = InMemoryUserRepository::new();
        let alice = repository
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_username = repository
            .find_by_username(&alice.username)
            .await
            .unwrap();
        let by_email = repository.find_by_email(&alice.email).await.unwrap();
        let by_id = repository.find_by_id(&alice.id).await.unwrap();

        assert_eq!(by_username.as_ref(), Some(&alice));
        assert_eq!(by_email.as_ref(), Some(&alice));
        assert_eq!(by_id.as_ref(), Some(&alice));
        assert_eq!(repository.find_by_id(&UserId(42)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_keeps_own_email() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        repository
            .create(new_user("bob", "bob@example.com"))
            .await
            .unwrap();

        alice.first_name = "Alicia".to_string();
        let updated = repository.update(alice.clone()).await.unwrap();
        assert_eq!(updated.first_name, "Alicia");

        alice.email = EmailAddress::new("bob@example.com".to_string()).unwrap();
        let clash = repository.update(alice).await;
        assert!(matches!(clash, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let repository = InMemoryUserRepository::new();

        let result = repository.delete(&UserId(1)).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_one_credential_per_owner() {
        let repository = InMemoryCredentialRepository::new();
        let credential = StoredCredential {
            owner_id: UserId(1),
            hash: vec![1; 32],
            salt: vec![2; 16],
        };

        repository.create(credential.clone()).await.unwrap();
        let second = repository.create(credential).await;

        assert!(matches!(second, Err(UserError::InsertFailed(_))));
    }

    #[tokio::test]
    async fn test_credential_update_and_delete() {
        let repository = InMemoryCredentialRepository::new();
        let owner_id = UserId(1);
        repository
            .create(StoredCredential {
                owner_id,
                hash: vec![1; 32],
                salt: vec![2; 16],
            })
            .await
            .unwrap();

        repository
            .update(StoredCredential {
                owner_id,
                hash: vec![3; 32],
                salt: vec![4; 16],
            })
            .await
            .unwrap();
        let stored = repository.find_by_owner_id(&owner_id).await.unwrap();
        assert_eq!(stored.map(|c| c.salt), Some(vec![4; 16]));

        repository.delete_by_owner_id(&owner_id).await.unwrap();
        assert_eq!(repository.find_by_owner_id(&owner_id).await.unwrap(), None);
        assert!(matches!(
            repository.delete_by_owner_id(&owner_id).await,
            Err(UserError::CredentialsNotFound(_))
        ));
    }
}
