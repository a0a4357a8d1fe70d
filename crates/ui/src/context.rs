use std::sync::Arc;

use dioxus::prelude::*;
use fit_core::model::{User, Workout};
use services::{AuthService, DashboardService, ProgressService, WorkoutSessionService};

pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn workout_sessions(&self) -> Arc<WorkoutSessionService>;
}

impl UiApp for services::AppServices {
    fn auth(&self) -> Arc<AuthService> {
        services::AppServices::auth(self)
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        services::AppServices::dashboard(self)
    }

    fn progress(&self) -> Arc<ProgressService> {
        services::AppServices::progress(self)
    }

    fn workout_sessions(&self) -> Arc<WorkoutSessionService> {
        services::AppServices::workout_sessions(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    progress: Arc<ProgressService>,
    workout_sessions: Arc<WorkoutSessionService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            dashboard: app.dashboard(),
            progress: app.progress(),
            workout_sessions: app.workout_sessions(),
        }
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

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Who is signed in, as far as the UI knows.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthStatus {
    /// Stored session not read yet.
    Checking,
    SignedOut,
    SignedIn(User),
}

impl AuthStatus {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Checking | Self::SignedOut => None,
        }
    }
}

/// Shared sign-in state, provided by `App`.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthState(pub Signal<AuthStatus>);

impl AuthState {
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.0.read().clone()
    }

    pub fn sign_in(mut self, user: User) {
        if self.0.peek().user() == Some(&user) {
            return;
        }
        self.0.set(AuthStatus::SignedIn(user));
    }

    pub fn sign_out(mut self) {
        self.0.set(AuthStatus::SignedOut);
    }
}

/// Workout handed from the dashboard to the session screen.
#[derive(Clone, Copy, PartialEq)]
pub struct SelectedWorkout(pub Signal<Option<Workout>>);

impl SelectedWorkout {
    pub fn select(mut self, workout: Workout) {
        self.0.set(Some(workout));
    }

    pub fn take(mut self) -> Option<Workout> {
        self.0.write().take()
    }
}
