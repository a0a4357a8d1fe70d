use std::sync::Arc;

use fit_core::model::{AuthSession, LoginForm, RegistrationForm, User};
use storage::SessionStore;
use storage::repository::StorageError;

use crate::backend::FitnessBackend;
use crate::error::AuthError;

/// Sign-in, sign-up, and the persisted session lifecycle.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn FitnessBackend>,
    sessions: SessionStore,
}

impl AuthService {
    #[must_use]
    pub fn new(backend: Arc<dyn FitnessBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// Validate the form, sign in, and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` before any request is sent,
    /// `AuthError::Rejected` with the backend message, or transport/storage errors.
    pub async fn login(&self, form: LoginForm) -> Result<AuthSession, AuthError> {
        let credentials = form.validate()?;
        let session = self.backend.login(&credentials).await?;
        self.sessions.save(&session).await?;
        tracing::info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    /// Validate the form, create the account, and persist the session.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::login`].
    pub async fn register(&self, form: RegistrationForm) -> Result<AuthSession, AuthError> {
        let registration = form.validate()?;
        let session = self.backend.register(&registration).await?;
        self.sessions.save(&session).await?;
        tracing::info!(user = %session.user.id, "account created");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored session cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Stored session from a previous run. A corrupt entry is discarded.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read or cleared.
    pub async fn restore(&self) -> Result<Option<AuthSession>, AuthError> {
        match self.sessions.load().await {
            Ok(session) => Ok(session),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%reason, "discarding unreadable stored session");
                self.sessions.clear().await?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch the latest profile and update the cached copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` on backend failures (including an expired session).
    pub async fn refresh_profile(&self) -> Result<User, AuthError> {
        let user = self.backend.profile().await?;
        self.sessions.save_user(&user).await?;
        Ok(user)
    }
}
