use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::exercise::Exercise;
use crate::model::ids::WorkoutId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum WorkoutError {
    #[error("workout name cannot be empty")]
    EmptyName,

    #[error("progress must be within 0..=100, got {provided}")]
    InvalidProgress { provided: f64 },

    #[error("unknown workout status: {0}")]
    UnknownStatus(String),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Pending,
    Active,
    Completed,
}

impl WorkoutStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutStatus {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(WorkoutError::UnknownStatus(other.to_owned())),
        }
    }
}

//
// ─── WORKOUT ───────────────────────────────────────────────────────────────────
//

/// A named, dated collection of exercises with aggregate progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    name: String,
    date: DateTime<Utc>,
    status: WorkoutStatus,
    progress: f64,
    exercises: Vec<Exercise>,
}

impl Workout {
    /// # Errors
    ///
    /// Returns `WorkoutError` if the name is blank or `progress` is outside `0..=100`.
    pub fn new(
        id: WorkoutId,
        name: impl Into<String>,
        date: DateTime<Utc>,
        status: WorkoutStatus,
        progress: f64,
        exercises: Vec<Exercise>,
    ) -> Result<Self, WorkoutError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WorkoutError::EmptyName);
        }
        if !(0.0..=100.0).contains(&progress) {
            return Err(WorkoutError::InvalidProgress { provided: progress });
        }

        Ok(Self {
            id,
            name,
            date,
            status,
            progress,
            exercises,
        })
    }

    #[must_use]
    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn status(&self) -> WorkoutStatus {
        self.status
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn completed_exercise_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.is_completed()).count()
    }

    /// Sum of sets × reps × weight over completed exercises.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(Exercise::volume).sum()
    }

    /// Replace exercise state and recompute progress/status from completion.
    ///
    /// Used to fold a session's local set counts back into a workout snapshot.
    #[must_use]
    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = exercises;
        self.progress = completion_percent(&self.exercises);
        if !self.exercises.is_empty() && self.progress >= 100.0 {
            self.status = WorkoutStatus::Completed;
        }
        self
    }
}

/// Percentage of completed exercises, 0 for an empty workout.
#[must_use]
pub fn completion_percent(exercises: &[Exercise]) -> f64 {
    if exercises.is_empty() {
        return 0.0;
    }
    let done = exercises.iter().filter(|e| e.is_completed()).count();
    #[allow(clippy::cast_precision_loss)]
    let pct = done as f64 / exercises.len() as f64 * 100.0;
    pct
}
