use std::sync::Arc;

use storage::SessionStore;
use storage::repository::Storage;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::backend::{FitnessBackend, HttpBackend};
use crate::config::ApiConfig;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::workout_session_service::WorkoutSessionService;

/// Assembles app-facing services around one backend and one session store.
#[derive(Clone)]
pub struct AppServices {
    sessions: SessionStore,
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    progress: Arc<ProgressService>,
    workout_sessions: Arc<WorkoutSessionService>,
}

impl AppServices {
    #[must_use]
    pub fn new(backend: Arc<dyn FitnessBackend>, storage: &Storage, clock: Clock) -> Self {
        let sessions = storage.sessions();
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(&backend), sessions.clone())),
            dashboard: Arc::new(DashboardService::new(
                Arc::clone(&backend),
                sessions.clone(),
            )),
            progress: Arc::new(ProgressService::new(Arc::clone(&backend))),
            workout_sessions: Arc::new(WorkoutSessionService::new(backend, clock)),
            sessions,
        }
    }

    /// Build services that talk to the REST backend with `SQLite`-backed
    /// session persistence.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client
    /// setup fails.
    pub async fn new_http(
        config: ApiConfig,
        db_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(api = config.base_url(), "using REST backend");
        let backend: Arc<dyn FitnessBackend> =
            Arc::new(HttpBackend::new(config, storage.sessions())?);
        Ok(Self::new(backend, &storage, clock))
    }

    #[must_use]
    pub fn sessions(&self) -> SessionStore {
        self.sessions.clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn workout_sessions(&self) -> Arc<WorkoutSessionService> {
        Arc::clone(&self.workout_sessions)
    }
}
