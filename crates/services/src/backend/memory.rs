use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use fit_core::model::{
    AuthSession, AuthToken, Credentials, ProgressStats, Registration, User, UserId,
    WeeklyProgress, Workout,
};
use storage::SessionStore;

use super::{Endpoint, FitnessBackend, SetReport};
use crate::error::ApiError;

#[derive(Default)]
struct State {
    accounts: Vec<(User, String)>,
    today: Option<Workout>,
    weekly: Vec<WeeklyProgress>,
    stats: ProgressStats,
    failures: HashMap<Endpoint, u16>,
    reports: Vec<SetReport>,
}

/// In-process stand-in for the REST backend, for tests and offline runs.
///
/// Shares the session store with the services so token checks and `401`
/// handling behave like `HttpBackend`.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    sessions: SessionStore,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            sessions,
        }
    }

    #[must_use]
    pub fn with_account(self, user: User, password: impl Into<String>) -> Self {
        self.with_state(|state| state.accounts.push((user, password.into())))
    }

    #[must_use]
    pub fn with_today(self, workout: Workout) -> Self {
        self.with_state(|state| state.today = Some(workout))
    }

    #[must_use]
    pub fn with_weekly(self, weekly: Vec<WeeklyProgress>) -> Self {
        self.with_state(|state| state.weekly = weekly)
    }

    #[must_use]
    pub fn with_stats(self, stats: ProgressStats) -> Self {
        self.with_state(|state| state.stats = stats)
    }

    /// Make every call to `endpoint` answer with `status`.
    pub fn fail(&self, endpoint: Endpoint, status: u16) {
        self.lock().failures.insert(endpoint, status);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failures.remove(&endpoint);
    }

    /// Set reports received so far, in arrival order.
    #[must_use]
    pub fn reports(&self) -> Vec<SetReport> {
        self.lock().reports.clone()
    }

    fn with_state(self, apply: impl FnOnce(&mut State)) -> Self {
        apply(&mut self.lock());
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock only happens in a failing test.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn injected(&self, endpoint: Endpoint) -> Option<u16> {
        self.lock().failures.get(&endpoint).copied()
    }

    async fn authorize(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        let status = match self.injected(endpoint) {
            Some(status) => status,
            None if self.sessions.token().await?.is_none() => 401,
            None => return Ok(()),
        };
        if status == 401 {
            self.sessions.clear().await?;
            return Err(ApiError::Unauthorized);
        }
        Err(ApiError::Status(status))
    }

    fn issue(user: User) -> AuthSession {
        let token = AuthToken::new(format!("token-{}", user.id));
        AuthSession { user, token }
    }
}

#[async_trait]
impl FitnessBackend for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        if let Some(status) = self.injected(Endpoint::Login) {
            return Err(ApiError::Status(status));
        }
        let state = self.lock();
        state
            .accounts
            .iter()
            .find(|(user, password)| {
                user.email.eq_ignore_ascii_case(&credentials.email)
                    && *password == credentials.password
            })
            .map(|(user, _)| Self::issue(user.clone()))
            .ok_or_else(|| ApiError::Rejected {
                status: 401,
                message: "Invalid email or password".into(),
            })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError> {
        if let Some(status) = self.injected(Endpoint::Register) {
            return Err(ApiError::Status(status));
        }
        let mut state = self.lock();
        if state
            .accounts
            .iter()
            .any(|(user, _)| user.email.eq_ignore_ascii_case(&registration.email))
        {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Email already registered".into(),
            });
        }
        let user = User {
            id: UserId::new(format!("user-{}", state.accounts.len() + 1)),
            name: registration.name.clone(),
            email: registration.email.clone(),
            avatar: None,
            total_workouts: 0,
            streak: 0,
        };
        state
            .accounts
            .push((user.clone(), registration.password.clone()));
        Ok(Self::issue(user))
    }

    async fn today_workout(&self) -> Result<Option<Workout>, ApiError> {
        self.authorize(Endpoint::TodayWorkout).await?;
        Ok(self.lock().today.clone())
    }

    async fn weekly_progress(&self) -> Result<Vec<WeeklyProgress>, ApiError> {
        self.authorize(Endpoint::WeeklyProgress).await?;
        Ok(self.lock().weekly.clone())
    }

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError> {
        self.authorize(Endpoint::ProgressStats).await?;
        Ok(self.lock().stats.clone())
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.authorize(Endpoint::Profile).await?;
        let session = self.sessions.load().await?.ok_or(ApiError::Unauthorized)?;
        let state = self.lock();
        state
            .accounts
            .iter()
            .find(|(user, _)| user.id == session.user.id)
            .map(|(user, _)| user.clone())
            .ok_or(ApiError::Status(404))
    }

    async fn complete_set(&self, report: &SetReport) -> Result<(), ApiError> {
        self.authorize(Endpoint::CompleteSet).await?;
        let mut state = self.lock();
        state.reports.push(report.clone());

        // Mirror the backend: bump the stored count, clamped at the target.
        if let Some(today) = state.today.take() {
            let exercises = today
                .exercises()
                .iter()
                .map(|exercise| {
                    if exercise.id() != &report.exercise_id || exercise.is_completed() {
                        return exercise.clone();
                    }
                    exercise
                        .clone()
                        .with_completed_sets(exercise.completed_sets() + 1)
                        .unwrap_or_else(|_| exercise.clone())
                })
                .collect();
            state.today = Some(today.with_exercises(exercises));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fit_core::model::{Exercise, ExerciseId, WorkoutId, WorkoutStatus};
    use fit_core::time::fixed_now;
    use storage::Storage;

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            avatar: None,
            total_workouts: 3,
            streak: 2,
        }
    }

    fn workout() -> Workout {
        let squat = Exercise::new(ExerciseId::new("sq"), "Squat", 2, 5, 100.0, 90).unwrap();
        Workout::new(
            WorkoutId::new("w1"),
            "Legs",
            fixed_now(),
            WorkoutStatus::Pending,
            0.0,
            vec![squat],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn authenticated_calls_need_a_token() {
        let storage = Storage::in_memory();
        let backend = InMemoryBackend::new(storage.sessions()).with_today(workout());

        assert!(backend.today_workout().await.unwrap_err().is_unauthorized());

        let session = backend
            .login(&Credentials {
                email: "ana@example.com".into(),
                password: "secret1".into(),
            })
            .await;
        assert!(matches!(session, Err(ApiError::Rejected { status: 401, .. })));
    }

    #[tokio::test]
    async fn injected_401_clears_store() {
        let storage = Storage::in_memory();
        let backend = InMemoryBackend::new(storage.sessions()).with_account(user(), "secret1");
        let session = backend
            .login(&Credentials {
                email: "ana@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        storage.sessions().save(&session).await.unwrap();

        backend.fail(Endpoint::WeeklyProgress, 401);
        assert!(backend.weekly_progress().await.unwrap_err().is_unauthorized());
        assert_eq!(storage.sessions().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn complete_set_updates_today() {
        let storage = Storage::in_memory();
        let backend = InMemoryBackend::new(storage.sessions())
            .with_account(user(), "secret1")
            .with_today(workout());
        let session = InMemoryBackend::issue(user());
        storage.sessions().save(&session).await.unwrap();

        let report = SetReport {
            workout_id: WorkoutId::new("w1"),
            exercise_id: ExerciseId::new("sq"),
            set_number: 1,
            weight_kg: 100.0,
            reps: 5,
        };
        for _ in 0..3 {
            backend.complete_set(&report).await.unwrap();
        }

        let today = backend.today_workout().await.unwrap().unwrap();
        assert_eq!(today.exercises()[0].completed_sets(), 2);
        assert_eq!(today.status(), WorkoutStatus::Completed);
        assert_eq!(backend.reports().len(), 3);
    }
}
