/// Persistence boundary
///
/// Two collaborator interfaces: the credential store holding user records
/// and the per-user settings provider. Production uses the Postgres
/// implementation; tests and local development use the in-memory one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::User;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persists user credential records.
///
/// Each operation is a single atomic read or write of one record; the
/// store is the only shared mutable state in the system (last writer wins
/// on the refresh token).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Exact-match lookup on the stored refresh token
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Insert a new record; a username collision fails with `DuplicateUser`
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn set_refresh_token(&self, username: &str, token: &str) -> Result<(), AppError>;

    async fn set_password_hash(&self, username: &str, hash: &str) -> Result<(), AppError>;
}

/// Returns/initializes the settings blob keyed by user identity.
///
/// The blob is opaque to the session logic; it is fetched read-only and
/// attached to session responses.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The stored blob, or `Value::Null` when the user has none
    async fn settings_for(&self, user_id: &Uuid) -> Result<serde_json::Value, AppError>;

    /// Seed the default blob for a newly registered user
    async fn init_defaults(&self, user_id: &Uuid) -> Result<(), AppError>;
}

/// The settings blob seeded at registration
pub fn default_user_settings() -> serde_json::Value {
    serde_json::json!({
        "layout": {
            "style": "vertical",
            "navbar": { "folded": false, "hidden": false },
            "toolbar": { "hidden": false, "position": "below" },
            "footer": { "hidden": true },
        },
        "theme": "default",
        "customScrollbars": true,
    })
}
