/// Auth Session Manager
///
/// Orchestrates login, identity lookup, refresh-token exchange,
/// registration, and password change by composing the credential store,
/// the password hasher, and the token service. Holds no state of its own:
/// every operation is a single pass over the store.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::{AppError, AuthError};
use crate::model::{User, UserProfile};
use crate::store::{CredentialStore, SettingsStore};

/// Role label attached to every session response
const SESSION_ROLE: &str = "admin";
/// Shortcut list attached to every session response
const SESSION_SHORTCUTS: &[&str] = &["contacts"];

/// A resolved session, as returned by authenticate and identify
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub access_token: String,
    pub settings: serde_json::Value,
    pub data: UserProfile,
    pub role: &'static str,
    pub shortcuts: &'static [&'static str],
}

impl SessionUser {
    fn assemble(access_token: String, settings: serde_json::Value, user: &User) -> Self {
        Self {
            access_token,
            settings,
            data: UserProfile::from(user),
            role: SESSION_ROLE,
            shortcuts: SESSION_SHORTCUTS,
        }
    }
}

/// Input to registration, assembled by the route handler
#[derive(Debug)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub photo_url: Option<String>,
    pub display_name: Option<String>,
}

pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    settings: Arc<dyn SettingsStore>,
    tokens: TokenService,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        settings: Arc<dyn SettingsStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            store,
            settings,
            tokens,
        }
    }

    /// Check credentials and open a session.
    ///
    /// Issues a fresh access and refresh token pair and overwrites the
    /// stored refresh token — logging in invalidates any previous refresh
    /// token for the user.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionUser, AppError> {
        let mut user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.tokens.issue_access_token(&user.username)?;
        let refresh_token = self.tokens.issue_refresh_token(&user.username)?;

        self.store
            .set_refresh_token(&user.username, &refresh_token)
            .await?;
        user.refresh_token = Some(refresh_token);

        let settings = self.settings_snapshot(&user.user_id).await;

        tracing::info!(username = %user.username, "User logged in");

        Ok(SessionUser::assemble(access_token, settings, &user))
    }

    /// Resolve the session behind an access token.
    ///
    /// The token's signature and expiry are verified before its claims are
    /// trusted; the input token is echoed back since no new token is
    /// issued.
    pub async fn identify(&self, access_token: &str) -> Result<SessionUser, AppError> {
        let claims = match self.tokens.verify_access_token(access_token) {
            Ok(claims) => claims,
            Err(err) => {
                // Attribution only: the unverified payload names who the
                // token claims to be, it does not authenticate anyone.
                let claimed = self
                    .tokens
                    .decode_unverified(access_token)
                    .map(|c| c.username)
                    .ok();
                tracing::warn!(claimed_username = ?claimed, error = %err, "Access token rejected");
                return Err(AuthError::InvalidToken.into());
            }
        };

        let user = self
            .store
            .find_by_username(&claims.username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let settings = self.settings_snapshot(&user.user_id).await;

        Ok(SessionUser::assemble(
            access_token.to_string(),
            settings,
            &user,
        ))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The supplied token must both equal the one currently on record for
    /// some user and pass signature/expiry verification. The stored token
    /// is left in place; it stays valid until the next login overwrites it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let user = self
            .store
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let claims = self
            .tokens
            .verify_refresh_token(refresh_token)
            .map_err(|err| {
                tracing::warn!(username = %user.username, error = %err, "Refresh token rejected");
                AuthError::Forbidden
            })?;

        self.tokens.issue_access_token(&claims.username)
    }

    /// Create a user record and seed its default settings.
    ///
    /// The password is hashed before it reaches the store. Settings
    /// seeding is best-effort: its failure is logged, not surfaced.
    pub async fn register(&self, registration: NewRegistration) -> Result<User, AppError> {
        let password_hash = hash_password(&registration.password)?;

        let user = User {
            user_id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            display_name: registration.display_name,
            photo_url: registration.photo_url,
            password_hash,
            refresh_token: None,
        };

        self.store.insert_user(&user).await?;

        if let Err(err) = self.settings.init_defaults(&user.user_id).await {
            tracing::warn!(
                username = %user.username,
                error = %err,
                "Failed to seed default settings for new user"
            );
        }

        tracing::info!(username = %user.username, "User registered");

        Ok(user)
    }

    /// Replace a user's password after checking the current one.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<User, AppError> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::InvalidRequest.into());
        }

        let mut user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(old_password, &user.password_hash)? {
            return Err(AuthError::Unauthorized.into());
        }

        let password_hash = hash_password(new_password)?;
        self.store
            .set_password_hash(&user.username, &password_hash)
            .await?;
        user.password_hash = password_hash;

        tracing::info!(username = %user.username, "Password changed");

        Ok(user)
    }

    /// Best-effort settings join: a store failure degrades to `null`
    /// instead of failing the session operation.
    async fn settings_snapshot(&self, user_id: &Uuid) -> serde_json::Value {
        match self.settings.settings_for(user_id).await {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Settings fetch failed");
                serde_json::Value::Null
            }
        }
    }
}
