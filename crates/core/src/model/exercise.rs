use thiserror::Error;
use url::Url;

use crate::model::ids::ExerciseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise name cannot be empty")]
    EmptyName,

    #[error("target sets must be >= 1")]
    InvalidSets,

    #[error("target weight must be finite and >= 0, got {provided}")]
    InvalidWeight { provided: f64 },

    #[error("completed sets ({completed}) exceed target sets ({target})")]
    CompletedExceedsTarget { completed: u32, target: u32 },

    #[error("invalid media reference: {0}")]
    InvalidMedia(String),
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// A single movement inside a workout.
///
/// The completed flag is derived from `completed_sets == sets`, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    id: ExerciseId,
    name: String,
    sets: u32,
    reps: u32,
    weight_kg: f64,
    rest_secs: u32,
    completed_sets: u32,
    image: Option<Url>,
}

impl Exercise {
    /// Create a fresh exercise with no completed sets.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if the name is blank, `sets` is zero, or the
    /// weight is negative or not finite.
    pub fn new(
        id: ExerciseId,
        name: impl Into<String>,
        sets: u32,
        reps: u32,
        weight_kg: f64,
        rest_secs: u32,
    ) -> Result<Self, ExerciseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ExerciseError::EmptyName);
        }
        if sets == 0 {
            return Err(ExerciseError::InvalidSets);
        }
        if !weight_kg.is_finite() || weight_kg < 0.0 {
            return Err(ExerciseError::InvalidWeight {
                provided: weight_kg,
            });
        }

        Ok(Self {
            id,
            name,
            sets,
            reps,
            weight_kg,
            rest_secs,
            completed_sets: 0,
            image: None,
        })
    }

    /// Attach a media reference (picture of the movement).
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::InvalidMedia` if `raw` is not an absolute URL.
    pub fn with_image(mut self, raw: &str) -> Result<Self, ExerciseError> {
        let url = Url::parse(raw).map_err(|err| ExerciseError::InvalidMedia(err.to_string()))?;
        self.image = Some(url);
        Ok(self)
    }

    /// Restore the completed-set count reported by the backend.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::CompletedExceedsTarget` if `completed > sets`.
    pub fn with_completed_sets(mut self, completed: u32) -> Result<Self, ExerciseError> {
        if completed > self.sets {
            return Err(ExerciseError::CompletedExceedsTarget {
                completed,
                target: self.sets,
            });
        }
        self.completed_sets = completed;
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> &ExerciseId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sets(&self) -> u32 {
        self.sets
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }

    #[must_use]
    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[must_use]
    pub fn rest_secs(&self) -> u32 {
        self.rest_secs
    }

    #[must_use]
    pub fn completed_sets(&self) -> u32 {
        self.completed_sets
    }

    #[must_use]
    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_sets == self.sets
    }

    /// Training volume (sets × reps × weight) counted once the exercise is done.
    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.is_completed() {
            f64::from(self.sets) * f64::from(self.reps) * self.weight_kg
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench() -> Exercise {
        Exercise::new(ExerciseId::new("ex_0"), "Bench Press", 4, 10, 80.0, 90).unwrap()
    }

    #[test]
    fn rejects_zero_sets() {
        let err = Exercise::new(ExerciseId::new("x"), "Row", 0, 10, 60.0, 60).unwrap_err();
        assert_eq!(err, ExerciseError::InvalidSets);
    }

    #[test]
    fn rejects_blank_name() {
        let err = Exercise::new(ExerciseId::new("x"), "  ", 3, 10, 60.0, 60).unwrap_err();
        assert_eq!(err, ExerciseError::EmptyName);
    }

    #[test]
    fn rejects_negative_weight() {
        let err = Exercise::new(ExerciseId::new("x"), "Row", 3, 10, -1.0, 60).unwrap_err();
        assert!(matches!(err, ExerciseError::InvalidWeight { .. }));
    }

    #[test]
    fn completed_flag_follows_count() {
        let partial = bench().with_completed_sets(3).unwrap();
        assert!(!partial.is_completed());
        assert!((partial.volume() - 0.0).abs() < f64::EPSILON);

        let done = bench().with_completed_sets(4).unwrap();
        assert!(done.is_completed());
        assert!((done.volume() - 3200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completed_count_cannot_exceed_target() {
        let err = bench().with_completed_sets(5).unwrap_err();
        assert_eq!(
            err,
            ExerciseError::CompletedExceedsTarget {
                completed: 5,
                target: 4
            }
        );
    }

    #[test]
    fn image_must_be_absolute_url() {
        assert!(bench().with_image("not a url").is_err());
        let with_image = bench().with_image("https://example.com/bench.jpg").unwrap();
        assert_eq!(
            with_image.image().map(Url::as_str),
            Some("https://example.com/bench.jpg")
        );
    }
}
