use thiserror::Error;

use crate::model::{ExerciseError, ValidationError, WorkoutError};
use crate::session::{SessionActionError, SessionStartError};

/// Umbrella error for callers that do not care which domain rule failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Workout(#[from] WorkoutError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    SessionStart(#[from] SessionStartError),
    #[error(transparent)]
    SessionAction(#[from] SessionActionError),
}
