use std::sync::Arc;

use fit_core::model::{ProgressStats, WeeklyProgress, group_weeks, summarize};

use crate::backend::FitnessBackend;
use crate::error::DashboardError;

pub const WEEKS_PER_MONTH: usize = 4;

/// Period tabs on the progress page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressPeriod {
    #[default]
    Week,
    Month,
}

impl ProgressPeriod {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressOverview {
    pub weekly: Vec<WeeklyProgress>,
    pub stats: ProgressStats,
    pub notices: Vec<String>,
}

impl ProgressOverview {
    /// Chart buckets for the selected period.
    #[must_use]
    pub fn series(&self, period: ProgressPeriod) -> Vec<WeeklyProgress> {
        match period {
            ProgressPeriod::Week => self.weekly.clone(),
            ProgressPeriod::Month => group_weeks(&self.weekly, WEEKS_PER_MONTH, "Month"),
        }
    }
}

/// Loads the progress page: weekly series plus lifetime stats.
#[derive(Clone)]
pub struct ProgressService {
    backend: Arc<dyn FitnessBackend>,
}

impl ProgressService {
    #[must_use]
    pub fn new(backend: Arc<dyn FitnessBackend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Returns `DashboardError::SessionExpired` when the backend rejects the
    /// token. When stats fail they are derived from the weekly series.
    pub async fn load(&self) -> Result<ProgressOverview, DashboardError> {
        let (weekly, stats) = tokio::join!(
            self.backend.weekly_progress(),
            self.backend.progress_stats()
        );
        if weekly.as_ref().is_err_and(|e| e.is_unauthorized())
            || stats.as_ref().is_err_and(|e| e.is_unauthorized())
        {
            return Err(DashboardError::SessionExpired);
        }

        let mut overview = ProgressOverview::default();
        match weekly {
            Ok(weeks) => overview.weekly = weeks,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load weekly progress");
                overview.notices.push("Could not load weekly progress".into());
            }
        }

        overview.stats = match stats {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load progress stats, deriving from series");
                let summary = summarize(&overview.weekly);
                ProgressStats {
                    total_volume: summary.total_volume,
                    avg_weight: summary.avg_weight,
                    completed_workouts: summary.total_workouts,
                    current_streak: 0,
                }
            }
        };

        Ok(overview)
    }
}
