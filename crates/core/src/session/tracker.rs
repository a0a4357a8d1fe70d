use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::Exercise;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("exercise index {index} out of range (workout has {len} exercises)")]
    UnknownExercise { index: usize, len: usize },
}

/// Result of recording one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Sets remain for this exercise.
    SetCompleted,
    /// The exercise reached its target; the session moves to the next one.
    ExerciseCompleted,
    /// The last exercise reached its target.
    WorkoutCompleted,
}

impl SetOutcome {
    /// Outcome for an exercise whose count is now `count` out of `target`.
    #[must_use]
    pub fn classify(count: u32, target: u32, more_exercises: bool) -> Self {
        if count < target {
            Self::SetCompleted
        } else if more_exercises {
            Self::ExerciseCompleted
        } else {
            Self::WorkoutCompleted
        }
    }
}

/// Completed-set counts per exercise index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionTracker {
    targets: Vec<u32>,
    completed: BTreeMap<usize, u32>,
}

impl ProgressionTracker {
    #[must_use]
    pub fn new(targets: Vec<u32>) -> Self {
        Self {
            targets,
            completed: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn for_exercises(exercises: &[Exercise]) -> Self {
        Self::new(exercises.iter().map(Exercise::sets).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn completed_sets(&self, index: usize) -> u32 {
        self.completed.get(&index).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn target_sets(&self, index: usize) -> Option<u32> {
        self.targets.get(index).copied()
    }

    #[must_use]
    pub fn is_exercise_complete(&self, index: usize) -> bool {
        self.target_sets(index)
            .is_some_and(|target| self.completed_sets(index) >= target)
    }

    /// Count one more set for the exercise at `index`, clamped at its target.
    ///
    /// Recording on an exercise that is already complete is a caller bug and
    /// trips a debug assertion; release builds keep the count clamped.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnknownExercise` if `index` is out of range.
    pub fn record_set_completion(&mut self, index: usize) -> Result<SetOutcome, TrackerError> {
        let target = self.target_sets(index).ok_or(TrackerError::UnknownExercise {
            index,
            len: self.targets.len(),
        })?;
        let current = self.completed_sets(index);
        debug_assert!(
            current < target,
            "set recorded on completed exercise {index} ({current}/{target})"
        );

        let count = current.saturating_add(1).min(target);
        self.completed.insert(index, count);

        let more_exercises = index + 1 < self.targets.len();
        Ok(SetOutcome::classify(count, target, more_exercises))
    }
}
