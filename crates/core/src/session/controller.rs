use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Exercise, ExerciseId, SessionId, Workout, WorkoutId};
use crate::session::clock::{ClockToken, RestClock, Tick};
use crate::session::tracker::{ProgressionTracker, SetOutcome, TrackerError};
use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStartError {
    #[error("workout has no exercises")]
    NoExercises,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionActionError {
    #[error("session is already finished")]
    Finished,

    #[error("action requires the working phase")]
    NotWorking,

    #[error("action requires the resting phase")]
    NotResting,

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Completed,
    Abandoned,
}

/// Observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Working,
    Resting { remaining: u32, running: bool },
    Finished(FinishReason),
}

impl SessionState {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Working,
    Resting,
    Finished(FinishReason),
}

/// One set completed during the session, ready to be reported to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRecord {
    pub workout_id: WorkoutId,
    pub exercise_id: ExerciseId,
    pub exercise_index: usize,
    /// 1-based number of the set that was just completed.
    pub set_number: u32,
    pub reps: u32,
    pub weight_kg: f64,
    pub outcome: SetOutcome,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SetRecorded(SetRecord),
    RestCompleted { exercise_index: usize },
    Abandoned { exercise_index: usize, at: DateTime<Utc> },
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// A guided run through one workout.
///
/// Owns the rest clock and the per-exercise set counts. All transitions go
/// through the methods below; side effects (reporting, notifications) are
/// queued as `SessionEvent`s and drained with `take_events`.
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    id: SessionId,
    workout: Workout,
    tracker: ProgressionTracker,
    rest: RestClock,
    phase: Phase,
    current: usize,
    events: Vec<SessionEvent>,
    clock: Clock,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl WorkoutSession {
    /// Begin a session at the first exercise with all counts at zero.
    ///
    /// Completed-set counts reported by the backend are not carried over.
    ///
    /// # Errors
    ///
    /// Returns `SessionStartError::NoExercises` for an empty workout.
    pub fn start(workout: Workout, clock: Clock) -> Result<Self, SessionStartError> {
        if workout.exercises().is_empty() {
            return Err(SessionStartError::NoExercises);
        }
        Ok(Self {
            id: SessionId::random(),
            tracker: ProgressionTracker::for_exercises(workout.exercises()),
            workout,
            rest: RestClock::new(),
            phase: Phase::Working,
            current: 0,
            events: Vec::new(),
            started_at: clock.now(),
            clock,
            finished_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The workout as it was when the session started.
    #[must_use]
    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.workout.exercises().len()
    }

    #[must_use]
    pub fn current_exercise(&self) -> &Exercise {
        &self.workout.exercises()[self.current]
    }

    #[must_use]
    pub fn completed_sets(&self, index: usize) -> u32 {
        self.tracker.completed_sets(index)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Working => SessionState::Working,
            Phase::Resting => SessionState::Resting {
                remaining: self.rest.remaining(),
                running: self.rest.is_running(),
            },
            Phase::Finished(reason) => SessionState::Finished(reason),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// Token the tick source must present; `None` unless a countdown is live.
    #[must_use]
    pub fn rest_token(&self) -> Option<ClockToken> {
        match self.phase {
            Phase::Resting => self.rest.token(),
            Phase::Working | Phase::Finished(_) => None,
        }
    }

    /// Up to `n` exercises after the current one.
    #[must_use]
    pub fn upcoming(&self, n: usize) -> &[Exercise] {
        let exercises = self.workout.exercises();
        let start = (self.current + 1).min(exercises.len());
        let end = start.saturating_add(n).min(exercises.len());
        &exercises[start..end]
    }

    /// Position of the current exercise for the header bar.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if matches!(self.phase, Phase::Finished(FinishReason::Completed)) {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.current as f64 / self.exercise_count() as f64 * 100.0;
        pct
    }

    /// "Set k of n" for the current exercise, with k capped at n.
    #[must_use]
    pub fn set_label(&self) -> String {
        let target = self.current_exercise().sets();
        let next = (self.tracker.completed_sets(self.current) + 1).min(target);
        format!("Set {next} of {target}")
    }

    /// The workout with this session's set counts and recomputed progress.
    #[must_use]
    pub fn workout_snapshot(&self) -> Workout {
        let exercises = self
            .workout
            .exercises()
            .iter()
            .enumerate()
            .map(|(index, exercise)| {
                exercise
                    .clone()
                    .with_completed_sets(self.tracker.completed_sets(index))
                    .unwrap_or_else(|_| exercise.clone())
            })
            .collect();
        self.workout.clone().with_exercises(exercises)
    }

    /// Drain queued events. Each event is returned exactly once.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record one set of the current exercise.
    ///
    /// # Errors
    ///
    /// `Finished` after the session ended, `NotWorking` while resting.
    pub fn complete_set(&mut self) -> Result<SetOutcome, SessionActionError> {
        match self.phase {
            Phase::Working => {}
            Phase::Resting => return Err(SessionActionError::NotWorking),
            Phase::Finished(_) => return Err(SessionActionError::Finished),
        }

        let index = self.current;
        let outcome = self.tracker.record_set_completion(index)?;
        let exercise = &self.workout.exercises()[index];
        let rest_secs = exercise.rest_secs();

        self.events.push(SessionEvent::SetRecorded(SetRecord {
            workout_id: self.workout.id().clone(),
            exercise_id: exercise.id().clone(),
            exercise_index: index,
            set_number: self.tracker.completed_sets(index),
            reps: exercise.reps(),
            weight_kg: exercise.weight_kg(),
            outcome,
            completed_at: self.clock.now(),
        }));

        match outcome {
            SetOutcome::SetCompleted => {
                if rest_secs > 0 {
                    self.rest.start(rest_secs);
                    self.phase = Phase::Resting;
                }
            }
            SetOutcome::ExerciseCompleted => {
                self.current += 1;
            }
            SetOutcome::WorkoutCompleted => self.finish(FinishReason::Completed),
        }
        Ok(outcome)
    }

    /// Pause or resume the rest countdown. Returns the new running flag.
    ///
    /// # Errors
    ///
    /// `NotResting` outside the resting phase.
    pub fn toggle_rest(&mut self) -> Result<bool, SessionActionError> {
        self.ensure_resting()?;
        self.rest.toggle().ok_or(SessionActionError::NotResting)
    }

    /// Restore the full rest duration, paused.
    ///
    /// # Errors
    ///
    /// `NotResting` outside the resting phase.
    pub fn reset_rest(&mut self) -> Result<(), SessionActionError> {
        self.ensure_resting()?;
        let secs = self.current_exercise().rest_secs();
        self.rest.reset(secs);
        Ok(())
    }

    /// End the rest early and return to work.
    ///
    /// # Errors
    ///
    /// `NotResting` outside the resting phase.
    pub fn skip_rest(&mut self) -> Result<(), SessionActionError> {
        self.ensure_resting()?;
        self.rest.stop();
        self.phase = Phase::Working;
        Ok(())
    }

    /// Stop the session early.
    ///
    /// # Errors
    ///
    /// `Finished` if the session already ended.
    pub fn abandon(&mut self) -> Result<(), SessionActionError> {
        if self.is_finished() {
            return Err(SessionActionError::Finished);
        }
        self.finish(FinishReason::Abandoned);
        self.events.push(SessionEvent::Abandoned {
            exercise_index: self.current,
            at: self.clock.now(),
        });
        Ok(())
    }

    /// Apply one second of rest. Ticks outside the resting phase or with a
    /// superseded token have no effect.
    pub fn tick(&mut self, token: ClockToken) -> Tick {
        if self.phase != Phase::Resting {
            return Tick::Ignored;
        }
        let tick = self.rest.tick(token);
        if tick == Tick::Completed {
            self.phase = Phase::Working;
            self.events.push(SessionEvent::RestCompleted {
                exercise_index: self.current,
            });
        }
        tick
    }

    fn ensure_resting(&self) -> Result<(), SessionActionError> {
        match self.phase {
            Phase::Resting => Ok(()),
            Phase::Working => Err(SessionActionError::NotResting),
            Phase::Finished(_) => Err(SessionActionError::Finished),
        }
    }

    fn finish(&mut self, reason: FinishReason) {
        self.rest.stop();
        self.phase = Phase::Finished(reason);
        self.finished_at = Some(self.clock.now());
    }
}
