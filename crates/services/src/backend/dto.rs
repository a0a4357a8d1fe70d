//! Wire shapes of the REST backend and their mapping to domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use fit_core::model::{
    AuthSession, AuthToken, Exercise, ExerciseId, User, Workout, WorkoutId, WorkoutStatus,
};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseDto {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_time: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_sets: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl ExerciseDto {
    pub fn into_domain(self) -> Result<Exercise, ApiError> {
        let base = Exercise::new(
            ExerciseId::new(self.id),
            self.name,
            self.sets,
            self.reps,
            self.weight,
            self.rest_time,
        )
        .map_err(fit_core::Error::from)?;

        // A completed flag without a count means every set was done.
        let completed_sets = if self.completed && self.completed_sets == 0 {
            self.sets
        } else {
            self.completed_sets.min(self.sets)
        };
        let exercise = base
            .with_completed_sets(completed_sets)
            .map_err(fit_core::Error::from)?;

        match self.image.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match exercise.clone().with_image(raw) {
                Ok(with_image) => Ok(with_image),
                Err(err) => {
                    tracing::debug!(error = %err, "ignoring exercise image");
                    Ok(exercise)
                }
            },
            _ => Ok(exercise),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkoutDto {
    pub id: String,
    pub name: String,
    pub date: String,
    pub status: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub exercises: Vec<ExerciseDto>,
}

impl WorkoutDto {
    pub fn into_domain(self) -> Result<Workout, ApiError> {
        let date = parse_backend_date(&self.date)?;
        let status: WorkoutStatus = self
            .status
            .parse()
            .map_err(fit_core::Error::from)?;
        let exercises = self
            .exercises
            .into_iter()
            .map(ExerciseDto::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Workout::new(
            WorkoutId::new(self.id),
            self.name,
            date,
            status,
            self.progress.clamp(0.0, 100.0),
            exercises,
        )
        .map_err(|err| fit_core::Error::from(err).into())
    }
}

/// Accepts RFC 3339 and the naive ISO timestamps the backend emits (UTC).
pub(crate) fn parse_backend_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| ApiError::Decode(format!("invalid date {raw:?}: {err}")))
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponseDto {
    pub user: User,
    pub token: String,
}

impl AuthResponseDto {
    pub fn into_domain(self) -> AuthSession {
        AuthSession {
            user: self.user,
            token: AuthToken::new(self.token),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompleteSetRequest {
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
}

/// Error body: `detail` is a string, or a list of `{ msg }` for validation failures.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDto {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorDto {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(str::to_owned),
            _ => None,
        }
    }
}
