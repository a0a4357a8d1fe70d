use std::sync::Arc;

use tokio::task::JoinHandle;

use fit_core::model::Workout;
use fit_core::session::{SessionEvent, SetOutcome, WorkoutSession};

use crate::Clock;
use crate::backend::{FitnessBackend, SetReport};
use crate::error::SessionServiceError;

/// Events drained from a session, plus the report tasks they spawned.
#[derive(Debug, Default)]
pub struct Flushed {
    pub events: Vec<SessionEvent>,
    /// One fire-and-forget task per recorded set. Dropping a handle does not
    /// cancel the report.
    pub reports: Vec<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct SetCompletion {
    pub outcome: SetOutcome,
    pub flushed: Flushed,
}

/// Runs workout sessions and reports completed sets to the backend.
///
/// Reports are never awaited by the session and never retried; failures are
/// logged.
#[derive(Clone)]
pub struct WorkoutSessionService {
    backend: Arc<dyn FitnessBackend>,
    clock: Clock,
}

impl WorkoutSessionService {
    #[must_use]
    pub fn new(backend: Arc<dyn FitnessBackend>, clock: Clock) -> Self {
        Self { backend, clock }
    }

    /// # Errors
    ///
    /// Returns `SessionServiceError::Start` for a workout without exercises.
    pub fn start(&self, workout: Workout) -> Result<WorkoutSession, SessionServiceError> {
        let session = WorkoutSession::start(workout, self.clock)?;
        tracing::info!(
            session = %session.id(),
            workout = %session.workout().id(),
            exercises = session.exercise_count(),
            "workout session started"
        );
        Ok(session)
    }

    /// Record a set and dispatch its report.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Action` if the session is resting or finished.
    pub fn complete_set(
        &self,
        session: &mut WorkoutSession,
    ) -> Result<SetCompletion, SessionServiceError> {
        let outcome = session.complete_set()?;
        if outcome == SetOutcome::WorkoutCompleted {
            tracing::info!(session = %session.id(), "workout completed");
        }
        Ok(SetCompletion {
            outcome,
            flushed: self.flush(session),
        })
    }

    /// # Errors
    ///
    /// Returns `SessionServiceError::Action` if the session already finished.
    pub fn abandon(&self, session: &mut WorkoutSession) -> Result<Flushed, SessionServiceError> {
        session.abandon()?;
        Ok(self.flush(session))
    }

    /// Drain queued events, spawning a report for each recorded set.
    pub fn flush(&self, session: &mut WorkoutSession) -> Flushed {
        let events = session.take_events();
        let mut reports = Vec::new();

        for event in &events {
            match event {
                SessionEvent::SetRecorded(record) => {
                    if let Some(handle) = self.dispatch(SetReport::from_record(record)) {
                        reports.push(handle);
                    }
                }
                SessionEvent::RestCompleted { exercise_index } => {
                    tracing::debug!(session = %session.id(), exercise_index, "rest complete");
                }
                SessionEvent::Abandoned { exercise_index, .. } => {
                    tracing::info!(session = %session.id(), exercise_index, "workout abandoned");
                }
            }
        }

        Flushed { events, reports }
    }

    fn dispatch(&self, report: SetReport) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(exercise = %report.exercise_id, "no async runtime, set report dropped");
            return None;
        };
        let backend = Arc::clone(&self.backend);
        Some(runtime.spawn(async move {
            match backend.complete_set(&report).await {
                Ok(()) => tracing::debug!(
                    exercise = %report.exercise_id,
                    set = report.set_number,
                    "set reported"
                ),
                Err(err) => tracing::warn!(
                    exercise = %report.exercise_id,
                    set = report.set_number,
                    error = %err,
                    "set report failed"
                ),
            }
        }))
    }
}
