use fit_core::model::Workout;
use fit_core::session::{
    ClockToken, FinishReason, SessionStartError, SessionState, SetOutcome, Tick, WorkoutSession,
};
use services::{SessionServiceError, WorkoutSessionService};

use crate::views::{ToastMessage, ViewError};
use crate::vm::dashboard_vm::{ExerciseRowVm, format_exercise_detail, percent};
use crate::vm::time_fmt::format_rest;

/// Exercises previewed below the current one.
pub const UPCOMING_PREVIEW: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    CompleteSet,
    ToggleRest,
    ResetRest,
    SkipRest,
    Abandon,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHeaderVm {
    pub workout_name: String,
    pub position_label: String,
    pub progress_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentExerciseVm {
    pub name: String,
    pub image: Option<String>,
    pub detail: String,
    pub set_label: String,
    pub rest_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestVm {
    pub remaining_label: String,
    pub running: bool,
}

/// UI wrapper around a running `WorkoutSession`.
#[derive(Clone, Debug)]
pub struct SessionVm {
    session: WorkoutSession,
}

impl SessionVm {
    #[must_use]
    pub fn new(session: WorkoutSession) -> Self {
        Self { session }
    }

    /// # Errors
    ///
    /// Returns `ViewError::NoWorkout` when the workout has no exercises.
    pub fn start(runner: &WorkoutSessionService, workout: Workout) -> Result<Self, ViewError> {
        match runner.start(workout) {
            Ok(session) => Ok(Self::new(session)),
            Err(SessionServiceError::Start(SessionStartError::NoExercises)) => {
                Err(ViewError::NoWorkout)
            }
            Err(_) => Err(ViewError::Unknown),
        }
    }

    #[must_use]
    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    #[must_use]
    pub fn header(&self) -> SessionHeaderVm {
        let count = self.session.exercise_count();
        let position = (self.session.current_index() + 1).min(count);
        SessionHeaderVm {
            workout_name: self.session.workout().name().to_owned(),
            position_label: format!("Exercise {position} of {count}"),
            progress_percent: percent(self.session.progress_percent()),
        }
    }

    #[must_use]
    pub fn current(&self) -> CurrentExerciseVm {
        let exercise = self.session.current_exercise();
        CurrentExerciseVm {
            name: exercise.name().to_owned(),
            image: exercise.image().map(ToString::to_string),
            detail: format_exercise_detail(exercise),
            set_label: self.session.set_label(),
            rest_label: format!("Rest {}", format_rest(exercise.rest_secs())),
        }
    }

    /// Rest card contents, only while resting.
    #[must_use]
    pub fn rest(&self) -> Option<RestVm> {
        match self.session.state() {
            SessionState::Resting { remaining, running } => Some(RestVm {
                remaining_label: format_rest(remaining),
                running,
            }),
            SessionState::Working | SessionState::Finished(_) => None,
        }
    }

    #[must_use]
    pub fn upcoming(&self) -> Vec<ExerciseRowVm> {
        self.session
            .upcoming(UPCOMING_PREVIEW)
            .iter()
            .map(|exercise| ExerciseRowVm {
                name: exercise.name().to_owned(),
                detail: format_exercise_detail(exercise),
                completed: false,
            })
            .collect()
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        match self.session.state() {
            SessionState::Finished(reason) => Some(reason),
            SessionState::Working | SessionState::Resting { .. } => None,
        }
    }

    #[must_use]
    pub fn is_resting(&self) -> bool {
        matches!(self.session.state(), SessionState::Resting { .. })
    }

    /// Token of the live countdown, if any.
    #[must_use]
    pub fn rest_token(&self) -> Option<ClockToken> {
        self.session.rest_token()
    }

    /// Token of the countdown while it is running. `None` when paused.
    #[must_use]
    pub fn ticking_token(&self) -> Option<ClockToken> {
        match self.session.state() {
            SessionState::Resting { running: true, .. } => self.session.rest_token(),
            SessionState::Resting { running: false, .. }
            | SessionState::Working
            | SessionState::Finished(_) => None,
        }
    }

    /// Apply a user intent. Returns the notifications it produced.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the intent does not fit the current
    /// phase (e.g. a double click after the workout finished).
    pub fn dispatch(
        &mut self,
        intent: SessionIntent,
        runner: &WorkoutSessionService,
    ) -> Result<Vec<ToastMessage>, ViewError> {
        let session = &mut self.session;
        let result = match intent {
            SessionIntent::CompleteSet => match runner.complete_set(session) {
                Ok(completion) => Ok(completion_toast(completion.outcome, session)
                    .into_iter()
                    .collect()),
                Err(err) => Err(err),
            },
            SessionIntent::ToggleRest => session
                .toggle_rest()
                .map(|_| Vec::new())
                .map_err(SessionServiceError::from),
            SessionIntent::ResetRest => session
                .reset_rest()
                .map(|()| Vec::new())
                .map_err(SessionServiceError::from),
            SessionIntent::SkipRest => session
                .skip_rest()
                .map(|()| Vec::new())
                .map_err(SessionServiceError::from),
            SessionIntent::Abandon => runner.abandon(session).map(|_| Vec::new()),
        };

        result.map_err(|err| {
            tracing::debug!(?intent, error = %err, "session intent rejected");
            ViewError::Unknown
        })
    }

    /// Advance the rest countdown by one second.
    pub fn tick(
        &mut self,
        token: ClockToken,
        runner: &WorkoutSessionService,
    ) -> (Tick, Option<ToastMessage>) {
        let tick = self.session.tick(token);
        if tick != Tick::Completed {
            return (tick, None);
        }
        runner.flush(&mut self.session);
        let toast = ToastMessage::info("Rest complete", "Time for your next set.");
        (tick, Some(toast))
    }
}

fn completion_toast(outcome: SetOutcome, session: &WorkoutSession) -> Option<ToastMessage> {
    match outcome {
        SetOutcome::SetCompleted => None,
        SetOutcome::ExerciseCompleted => Some(ToastMessage::success(
            "Exercise complete!",
            format!("Next up: {}", session.current_exercise().name()),
        )),
        SetOutcome::WorkoutCompleted => Some(ToastMessage::success(
            "Workout complete!",
            format!("Great job finishing {}.", session.workout().name()),
        )),
    }
}
