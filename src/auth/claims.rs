/// JWT Claims structure
///
/// Represents the payload of a signed token. Both access and refresh
/// tokens carry the same claim set; they differ only in signing secret
/// and lifetime.

use serde::{Deserialize, Serialize};

/// Claims embedded in access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username the token was issued for
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create new claims expiring `expiry_seconds` from now
    pub fn new(username: String, expiry_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            username,
            exp: now + expiry_seconds,
            iat: now,
        }
    }

    /// Check if the embedded expiry has passed
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}
