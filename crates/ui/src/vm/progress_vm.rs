use fit_core::model::ProgressStats;
use services::{ProgressOverview, ProgressPeriod};

use crate::vm::dashboard_vm::{BarVm, map_volume_bars};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressVm {
    pub period: ProgressPeriod,
    pub stats: Vec<StatCardVm>,
    pub bars: Vec<BarVm>,
}

#[must_use]
pub fn map_stat_cards(stats: &ProgressStats) -> Vec<StatCardVm> {
    vec![
        StatCardVm {
            label: "Total volume",
            value: format!("{:.0} kg", stats.total_volume),
        },
        StatCardVm {
            label: "Average weight",
            value: format!("{:.1} kg", stats.avg_weight),
        },
        StatCardVm {
            label: "Completed workouts",
            value: stats.completed_workouts.to_string(),
        },
        StatCardVm {
            label: "Current streak",
            value: format!("{} days", stats.current_streak),
        },
    ]
}

#[must_use]
pub fn map_progress(overview: &ProgressOverview, period: ProgressPeriod) -> ProgressVm {
    ProgressVm {
        period,
        stats: map_stat_cards(&overview.stats),
        bars: map_volume_bars(&overview.series(period)),
    }
}
