//! REST backend collaborator.

use async_trait::async_trait;

use fit_core::model::{
    AuthSession, Credentials, ExerciseId, ProgressStats, Registration, User, WeeklyProgress,
    Workout, WorkoutId,
};
use fit_core::session::SetRecord;

use crate::error::ApiError;

mod dto;
mod http;
mod memory;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

/// Backend operations used by the client.
///
/// Authenticated calls read the bearer token from the session store. A `401`
/// from any of them clears the store and yields `ApiError::Unauthorized`.
#[async_trait]
pub trait FitnessBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message on bad credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message, e.g. a taken email.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError>;

    /// Today's workout, `None` when nothing is scheduled.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decoding failures.
    async fn today_workout(&self) -> Result<Option<Workout>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decoding failures.
    async fn weekly_progress(&self) -> Result<Vec<WeeklyProgress>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decoding failures.
    async fn progress_stats(&self) -> Result<ProgressStats, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decoding failures.
    async fn profile(&self) -> Result<User, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failures.
    async fn complete_set(&self, report: &SetReport) -> Result<(), ApiError>;
}

/// Body and path of a `complete-set` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SetReport {
    pub workout_id: WorkoutId,
    pub exercise_id: ExerciseId,
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
}

impl SetReport {
    #[must_use]
    pub fn from_record(record: &SetRecord) -> Self {
        Self {
            workout_id: record.workout_id.clone(),
            exercise_id: record.exercise_id.clone(),
            set_number: record.set_number,
            weight_kg: record.weight_kg,
            reps: record.reps,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!(
            "workouts/{}/exercises/{}/complete-set",
            self.workout_id, self.exercise_id
        )
    }
}

/// Backend call sites, used to inject failures into `InMemoryBackend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Register,
    TodayWorkout,
    WeeklyProgress,
    ProgressStats,
    Profile,
    CompleteSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_path_matches_backend_route() {
        let report = SetReport {
            workout_id: WorkoutId::new("w-1"),
            exercise_id: ExerciseId::new("ex_0"),
            set_number: 1,
            weight_kg: 80.0,
            reps: 10,
        };
        assert_eq!(report.path(), "workouts/w-1/exercises/ex_0/complete-set");
    }
}
