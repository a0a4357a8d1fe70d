mod auth;
mod exercise;
mod ids;
mod progress;
mod user;
mod workout;

pub use auth::{
    Credentials, LoginForm, NAME_MAX_CHARS, NAME_MIN_CHARS, PASSWORD_MIN_CHARS, Registration,
    RegistrationForm, ValidationError,
};
pub use exercise::{Exercise, ExerciseError};
pub use ids::{ExerciseId, ParseIdError, SessionId, UserId, WorkoutId};
pub use progress::{
    ProgressStats, SeriesSummary, WeeklyProgress, group_weeks, last_weeks, summarize,
};
pub use user::{AuthSession, AuthToken, User};
pub use workout::{Workout, WorkoutError, WorkoutStatus, completion_percent};
