use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use fit_core::model::{
    AuthSession, Credentials, ProgressStats, Registration, User, WeeklyProgress, Workout,
};
use storage::SessionStore;

use super::dto::{
    AuthResponseDto, CompleteSetRequest, ErrorDto, LoginRequest, RegisterRequest, WorkoutDto,
};
use super::{FitnessBackend, SetReport};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `reqwest` client for the fitness REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
    sessions: SessionStore,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig, sessions: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            sessions,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send_authorized(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.sessions.token().await? {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("backend rejected stored token, clearing session");
            self.sessions.clear().await?;
            return Err(ApiError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "GET");
        let response = self.send_authorized(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn post_auth<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<AuthSession, ApiError> {
        let url = self.config.endpoint(path);
        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response)
                .await
                .unwrap_or_else(|| fallback.to_owned());
            return Err(ApiError::Rejected { status, message });
        }

        let body: AuthResponseDto = response.json().await?;
        Ok(body.into_domain())
    }
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorDto>()
        .await
        .ok()
        .and_then(|body| body.message())
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    match error_message(response).await {
        Some(message) => ApiError::Rejected { status, message },
        None => ApiError::Status(status),
    }
}

#[async_trait]
impl FitnessBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.post_auth("auth/login", &body, "Invalid email or password")
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError> {
        let body = RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            password: &registration.password,
        };
        self.post_auth("auth/register", &body, "Could not create account")
            .await
    }

    async fn today_workout(&self) -> Result<Option<Workout>, ApiError> {
        match self.get_json::<WorkoutDto>("workouts/today").await {
            Ok(dto) => dto.into_domain().map(Some),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn weekly_progress(&self) -> Result<Vec<WeeklyProgress>, ApiError> {
        self.get_json("progress/weekly").await
    }

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError> {
        self.get_json("progress/stats").await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.get_json("user/profile").await
    }

    async fn complete_set(&self, report: &SetReport) -> Result<(), ApiError> {
        let url = self.config.endpoint(&report.path());
        let body = CompleteSetRequest {
            set_number: report.set_number,
            weight: report.weight_kg,
            reps: report.reps,
        };
        self.send_authorized(self.client.post(url).json(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storage::Storage;

    #[test]
    fn backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpBackend>();
    }

    #[tokio::test]
    async fn unreachable_backend_surfaces_transport_error() {
        let storage = Storage::in_memory();
        // Port 9 (discard) is closed on test hosts.
        let config = ApiConfig::new("http://127.0.0.1:9", Duration::from_millis(500));
        let backend = HttpBackend::new(config, storage.sessions()).unwrap();

        let err = backend.weekly_progress().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
