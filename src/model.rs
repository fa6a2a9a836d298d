/// User records and their response projection
///
/// `User` is the stored credential record. It is never serialized
/// directly: responses go through `UserProfile`, which carries no
/// password hash by construction.

use serde::Serialize;
use uuid::Uuid;

/// A credential record as held by the store
#[derive(Debug, Clone)]
pub struct User {
    /// Opaque unique identifier, generated at registration, immutable
    pub user_id: Uuid,
    /// Unique login name, the lookup key for authentication
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// bcrypt hash; the plaintext never reaches the store
    pub password_hash: String,
    /// Set on login, overwritten by each login, consumed but not cleared on refresh
    pub refresh_token: Option<String>,
}

/// Response projection of a `User`, built at the response boundary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub refresh_token: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            refresh_token: user.refresh_token.clone(),
        }
    }
}
