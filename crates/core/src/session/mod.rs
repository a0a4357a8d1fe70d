//! Guided workout session: rest countdown, set tracking, and the controller
//! that ties them together.

mod clock;
mod controller;
mod tracker;

pub use clock::{ClockToken, RestClock, Tick};
pub use controller::{
    FinishReason, SessionActionError, SessionEvent, SessionStartError, SessionState, SetRecord,
    WorkoutSession,
};
pub use tracker::{ProgressionTracker, SetOutcome, TrackerError};
