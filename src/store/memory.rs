/// In-memory store
///
/// Backs the integration suites and local development. Same contract as
/// the Postgres store, including the username uniqueness rule.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AuthError};
use crate::model::User;
use crate::store::{default_user_settings, CredentialStore, SettingsStore};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    settings: RwLock<HashMap<Uuid, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::Auth(AuthError::DuplicateUser));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn set_refresh_token(&self, username: &str, token: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(username) {
            Some(user) => {
                user.refresh_token = Some(token.to_string());
                Ok(())
            }
            None => Err(AppError::Auth(AuthError::UserNotFound)),
        }
    }

    async fn set_password_hash(&self, username: &str, hash: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(username) {
            Some(user) => {
                user.password_hash = hash.to_string();
                Ok(())
            }
            None => Err(AppError::Auth(AuthError::UserNotFound)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn settings_for(&self, user_id: &Uuid) -> Result<serde_json::Value, AppError> {
        Ok(self
            .settings
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn init_defaults(&self, user_id: &Uuid) -> Result<(), AppError> {
        self.settings
            .write()
            .await
            .insert(*user_id, default_user_settings());
        Ok(())
    }
}
