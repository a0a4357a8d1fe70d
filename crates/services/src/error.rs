//! Shared error types for the services crate.

use thiserror::Error;

use fit_core::model::ValidationError;
use fit_core::session::{SessionActionError, SessionStartError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by backend calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The stored token was rejected; the persisted session has been cleared.
    #[error("session expired")]
    Unauthorized,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("backend request failed with status {0}")]
    Status(u16),
    #[error("unexpected backend payload: {0}")]
    Decode(String),
    /// Payload decoded but breaks a domain rule (e.g. completed > target sets).
    #[error("invalid backend data: {0}")]
    Model(#[from] fit_core::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status(404) | Self::Rejected { status: 404, .. }
        )
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => Self::Rejected(message),
            other => Self::Api(other),
        }
    }
}

impl AuthError {
    /// Text suitable for the auth screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Api(_) | Self::Storage(_) => "Something went wrong. Please try again.".into(),
        }
    }
}

/// Errors emitted by the dashboard and progress loaders.
///
/// Other backend failures degrade to placeholders with a notice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("session expired")]
    SessionExpired,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `WorkoutSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    Start(#[from] SessionStartError),
    #[error(transparent)]
    Action(#[from] SessionActionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_api_error_becomes_auth_message() {
        let err: AuthError = ApiError::Rejected {
            status: 401,
            message: "Invalid email or password".into(),
        }
        .into();
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AuthError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.user_message(), "Passwords do not match");
    }

    #[test]
    fn not_found_matches_plain_and_detailed_status() {
        assert!(ApiError::Status(404).is_not_found());
        assert!(
            ApiError::Rejected {
                status: 404,
                message: "none".into()
            }
            .is_not_found()
        );
        assert!(!ApiError::Status(500).is_not_found());
    }
}
