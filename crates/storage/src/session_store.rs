use std::sync::Arc;

use fit_core::model::{AuthSession, AuthToken, User};

use crate::repository::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "fitness_token";
pub const USER_KEY: &str = "fitness_user";

/// Persisted sign-in state: the bearer token and the cached user profile.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the stored session. Both entries must be present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the cached profile is not
    /// valid JSON, or other storage errors.
    pub async fn load(&self) -> Result<Option<AuthSession>, StorageError> {
        let Some(token) = self.kv.get(TOKEN_KEY).await? else {
            return Ok(None);
        };
        let Some(raw_user) = self.kv.get(USER_KEY).await? else {
            return Ok(None);
        };
        let user: User = serde_json::from_str(&raw_user)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(AuthSession {
            user,
            token: AuthToken::new(token),
        }))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if either entry cannot be written.
    pub async fn save(&self, session: &AuthSession) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(&session.user)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(TOKEN_KEY, session.token.expose()).await?;
        self.kv.put(USER_KEY, &raw_user).await
    }

    /// Replace only the cached profile, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be written.
    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(USER_KEY, &raw_user).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be read.
    pub async fn token(&self) -> Result<Option<AuthToken>, StorageError> {
        Ok(self.kv.get(TOKEN_KEY).await?.map(AuthToken::new))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if either entry cannot be removed.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(TOKEN_KEY).await?;
        self.kv.remove(USER_KEY).await
    }
}
