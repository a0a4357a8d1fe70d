use std::sync::Arc;

use fit_core::model::{User, WeeklyProgress, Workout, last_weeks};
use storage::SessionStore;

use crate::backend::FitnessBackend;
use crate::error::{ApiError, DashboardError};

/// Weeks shown in the dashboard mini-chart.
pub const DASHBOARD_WEEKS: usize = 7;

/// Everything the dashboard renders, with placeholders for failed parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub user: Option<User>,
    pub today: Option<Workout>,
    pub weekly: Vec<WeeklyProgress>,
    /// Non-blocking messages for parts that could not be loaded.
    pub notices: Vec<String>,
}

impl DashboardData {
    #[must_use]
    pub fn recent_weeks(&self) -> &[WeeklyProgress] {
        last_weeks(&self.weekly, DASHBOARD_WEEKS)
    }
}

/// Loads today's workout and weekly progress.
#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn FitnessBackend>,
    sessions: SessionStore,
}

impl DashboardService {
    #[must_use]
    pub fn new(backend: Arc<dyn FitnessBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// Fetch all dashboard parts concurrently.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::SessionExpired` when the backend rejects the
    /// token; any other failure degrades to a placeholder plus a notice.
    pub async fn load(&self) -> Result<DashboardData, DashboardError> {
        let (today, weekly, profile) = tokio::join!(
            self.backend.today_workout(),
            self.backend.weekly_progress(),
            self.backend.profile(),
        );

        if [
            today.as_ref().err(),
            weekly.as_ref().err(),
            profile.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .any(ApiError::is_unauthorized)
        {
            return Err(DashboardError::SessionExpired);
        }

        let mut data = DashboardData::default();

        match today {
            Ok(workout) => data.today = workout,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load today's workout");
                data.notices.push("Could not load today's workout".into());
            }
        }

        match weekly {
            Ok(weeks) => data.weekly = weeks,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load weekly progress");
                data.notices.push("Could not load weekly progress".into());
            }
        }

        data.user = match profile {
            Ok(user) => {
                self.sessions.save_user(&user).await?;
                Some(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "using cached profile");
                self.sessions.load().await?.map(|session| session.user)
            }
        };

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Endpoint, InMemoryBackend};
    use fit_core::model::{
        AuthSession, AuthToken, Exercise, ExerciseId, UserId, WorkoutId, WorkoutStatus,
    };
    use fit_core::time::fixed_now;
    use storage::Storage;

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            avatar: None,
            total_workouts: 12,
            streak: 4,
        }
    }

    fn workout() -> Workout {
        let press = Exercise::new(ExerciseId::new("p"), "Press", 3, 8, 40.0, 60).unwrap();
        Workout::new(
            WorkoutId::new("w1"),
            "Push",
            fixed_now(),
            WorkoutStatus::Pending,
            0.0,
            vec![press],
        )
        .unwrap()
    }

    fn weeks(n: usize) -> Vec<WeeklyProgress> {
        (1..=n)
            .map(|i| WeeklyProgress {
                week: format!("Sem {i}"),
                volume: 1000.0 * i as f64,
                weight: 300.0,
                workouts: 3,
            })
            .collect()
    }

    async fn signed_in() -> (DashboardService, InMemoryBackend, Storage) {
        let storage = Storage::in_memory();
        let backend = InMemoryBackend::new(storage.sessions())
            .with_account(user(), "secret1")
            .with_today(workout())
            .with_weekly(weeks(9));
        storage
            .sessions()
            .save(&AuthSession {
                user: user(),
                token: AuthToken::new("tok"),
            })
            .await
            .unwrap();
        let service = DashboardService::new(Arc::new(backend.clone()), storage.sessions());
        (service, backend, storage)
    }

    #[tokio::test]
    async fn loads_all_parts() {
        let (service, _, _) = signed_in().await;
        let data = service.load().await.unwrap();

        assert_eq!(data.today.unwrap().name(), "Push");
        assert_eq!(data.weekly.len(), 9);
        assert_eq!(data.user.unwrap().streak, 4);
        assert!(data.notices.is_empty());
    }

    #[tokio::test]
    async fn recent_weeks_keeps_last_seven() {
        let (service, _, _) = signed_in().await;
        let data = service.load().await.unwrap();
        assert_eq!(data.recent_weeks().len(), 7);
        assert_eq!(data.recent_weeks()[0].week, "Sem 3");
    }

    #[tokio::test]
    async fn failures_degrade_to_placeholders() {
        let (service, backend, _) = signed_in().await;
        backend.fail(Endpoint::TodayWorkout, 500);
        backend.fail(Endpoint::Profile, 503);

        let data = service.load().await.unwrap();
        assert!(data.today.is_none());
        assert_eq!(data.weekly.len(), 9);
        assert_eq!(data.notices, vec!["Could not load today's workout".to_owned()]);
        assert_eq!(data.user.unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn expired_token_is_an_error() {
        let (service, backend, storage) = signed_in().await;
        backend.fail(Endpoint::WeeklyProgress, 401);

        assert!(matches!(
            service.load().await.unwrap_err(),
            DashboardError::SessionExpired
        ));
        assert_eq!(storage.sessions().load().await.unwrap(), None);
    }
}
