/// Postgres store
///
/// Production implementation of both persistence interfaces, one table
/// each (`users`, `user_settings`). Queries are runtime-bound; the schema
/// lives under `migrations/`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AuthError};
use crate::model::User;
use crate::store::{default_user_settings, CredentialStore, SettingsStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type UserRow = (
    Uuid,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    Option<String>,
);

fn row_to_user(row: UserRow) -> User {
    User {
        user_id: row.0,
        username: row.1,
        email: row.2,
        display_name: row.3,
        photo_url: row.4,
        password_hash: row.5,
        refresh_token: row.6,
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, display_name, photo_url, password_hash, refresh_token
            FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_user))
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, display_name, photo_url, password_hash, refresh_token
            FROM users WHERE refresh_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_user))
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, display_name, photo_url,
                               password_hash, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.photo_url)
        .bind(&user.password_hash)
        .bind(&user.refresh_token)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_refresh_token(&self, username: &str, token: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $1, updated_at = $2 WHERE username = $3",
        )
        .bind(token)
        .bind(Utc::now())
        .bind(username)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Auth(AuthError::UserNotFound));
        }
        Ok(())
    }

    async fn set_password_hash(&self, username: &str, hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = $2 WHERE username = $3",
        )
        .bind(hash)
        .bind(Utc::now())
        .bind(username)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Auth(AuthError::UserNotFound));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn settings_for(&self, user_id: &Uuid) -> Result<serde_json::Value, AppError> {
        let blob = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT settings FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blob.unwrap_or(serde_json::Value::Null))
    }

    async fn init_defaults(&self, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, settings, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(default_user_settings())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
