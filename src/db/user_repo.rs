/// Account repository: the persistence collaborator of the credential core
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;

/// External system of record for accounts.
///
/// Reset-token state goes through [`store_reset_token`] and
/// [`update_password_and_clear_reset_token`] so that `reset_token` and
/// `reset_token_expires_at` are never written independently.
///
/// [`store_reset_token`]: UserRepository::store_reset_token
/// [`update_password_and_clear_reset_token`]: UserRepository::update_password_and_clear_reset_token
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_alias(&self, alias: &str) -> Result<Option<User>>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>>;

    async fn create(&self, user: &User) -> Result<()>;

    /// Attach a reset token to the account, replacing any previous one.
    async fn store_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Persist a new password hash and clear the reset token and its expiry
    /// in the same operation.
    async fn update_password_and_clear_reset_token(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<()>;
}

/// Postgres-backed repository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, alias, display_name, password_hash, is_blocked,
                   reset_token, reset_token_expires_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, alias, display_name, password_hash, is_blocked,
                   reset_token, reset_token_expires_at, created_at
            FROM users
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, alias, display_name, password_hash, is_blocked,
                   reset_token, reset_token_expires_at, created_at
            FROM users
            WHERE reset_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, alias, display_name, password_hash, is_blocked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.alias)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.is_blocked)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn store_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2, reset_token_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {user_id}")));
        }
        Ok(())
    }

    async fn update_password_and_clear_reset_token(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL, reset_token_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {user_id}")));
        }
        Ok(())
    }
}
