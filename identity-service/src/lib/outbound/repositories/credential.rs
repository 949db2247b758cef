use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::CredentialRepository;
use crate::user::errors::UserError;

/// PostgreSQL implementation of CredentialRepository over the `credentials` table.
///
/// One row per owner, enforced by `credentials_owner_id_key`.
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn create(&self, credential: StoredCredential) -> Result<StoredCredential, UserError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (owner_id, hash, salt)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(credential.owner_id.0)
        .bind(&credential.hash)
        .bind(&credential.salt)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                    return UserError::InsertFailed(format!(
                        "Credentials insert failed for user {}",
                        credential.owner_id
                    ));
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(credential)
    }

    async fn find_by_owner_id(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<StoredCredential>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT owner_id, hash, salt
            FROM credentials
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(|r| -> Result<StoredCredential, sqlx::Error> {
            Ok(StoredCredential {
                owner_id: UserId(r.try_get("owner_id")?),
                hash: r.try_get("hash")?,
                salt: r.try_get("salt")?,
            })
        })
        .transpose()
        .map_err(|e| UserError::DatabaseError(e.to_string()))
    }

    async fn update(&self, credential: StoredCredential) -> Result<StoredCredential, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET hash = $2, salt = $3
            WHERE owner_id = $1
            "#,
        )
        .bind(credential.owner_id.0)
        .bind(&credential.hash)
        .bind(&credential.salt)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::CredentialsNotFound(
                credential.owner_id.to_string(),
            ));
        }

        Ok(credential)
    }

    async fn delete_by_owner_id(&self, owner_id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM credentials
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::CredentialsNotFound(owner_id.to_string()));
        }

        Ok(())
    }
}
