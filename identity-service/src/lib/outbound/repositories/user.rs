use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// PostgreSQL implementation of UserRepository over the `system_user` table.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, UserError> {
        let id: i64 = row.try_get("id").map_err(database_error)?;
        let first_name: String = row.try_get("first_name").map_err(database_error)?;
        let last_name: String = row.try_get("last_name").map_err(database_error)?;
        let email: String = row.try_get("email").map_err(database_error)?;
        let username: String = row.try_get("username").map_err(database_error)?;

        Ok(User {
            id: UserId(id),
            first_name,
            last_name,
            email: EmailAddress::new(email)?,
            username: Username::new(username)?,
        })
    }

    async fn find_one(&self, sql: &str, value: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

/// Maps unique violations on username/email to their domain errors.
fn write_error(e: sqlx::Error, username: &Username, email: &EmailAddress) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("system_user_username_key") {
                return UserError::UsernameAlreadyExists(username.as_str().to_string());
            }
            if db_err.constraint() == Some("system_user_email_key") {
                return UserError::EmailAlreadyExists(email.as_str().to_string());
            }
        }
    }
    database_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query(
            r#"
            INSERT INTO system_user (first_name, last_name, email, username)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        let id: i64 = row.try_get("id").map_err(database_error)?;

        Ok(User {
            id: UserId(id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, username
            FROM system_user
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.find_one(
            r#"
            SELECT id, first_name, last_name, email, username
            FROM system_user
            WHERE username = $1
            "#,
            username.as_str(),
        )
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.find_one(
            r#"
            SELECT id, first_name, last_name, email, username
            FROM system_user
            WHERE email = $1
            "#,
            email.as_str(),
        )
        .await
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE system_user
            SET first_name = $2, last_name = $3, email = $4, username = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM system_user
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
