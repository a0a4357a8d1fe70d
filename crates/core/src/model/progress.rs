use serde::{Deserialize, Serialize};

/// One bucket of the weekly progress series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub week: String,
    pub volume: f64,
    /// Average weight lifted in the week; absent in older payloads.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub workouts: u32,
}

/// Lifetime statistics for the progress page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_volume: f64,
    pub avg_weight: f64,
    pub completed_workouts: u32,
    pub current_streak: u32,
}

/// Totals over a weekly series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesSummary {
    pub total_volume: f64,
    pub avg_weight: f64,
    pub total_workouts: u32,
    pub peak_volume: f64,
}

#[must_use]
pub fn summarize(series: &[WeeklyProgress]) -> SeriesSummary {
    if series.is_empty() {
        return SeriesSummary::default();
    }
    let total_volume = series.iter().map(|w| w.volume).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_weight = series.iter().map(|w| w.weight).sum::<f64>() / series.len() as f64;
    let total_workouts = series.iter().map(|w| w.workouts).sum();
    let peak_volume = series.iter().map(|w| w.volume).fold(0.0, f64::max);

    SeriesSummary {
        total_volume,
        avg_weight,
        total_workouts,
        peak_volume,
    }
}

/// Last `n` weeks of the series, oldest first.
#[must_use]
pub fn last_weeks(series: &[WeeklyProgress], n: usize) -> &[WeeklyProgress] {
    let start = series.len().saturating_sub(n);
    &series[start..]
}

/// Fold consecutive weeks into buckets of `weeks_per_bucket`, labelled by
/// position ("Month 1", "Month 2", ...). A trailing partial bucket is kept.
#[must_use]
pub fn group_weeks(
    series: &[WeeklyProgress],
    weeks_per_bucket: usize,
    label: &str,
) -> Vec<WeeklyProgress> {
    if weeks_per_bucket == 0 {
        return Vec::new();
    }
    series
        .chunks(weeks_per_bucket)
        .enumerate()
        .map(|(idx, chunk)| {
            let summary = summarize(chunk);
            WeeklyProgress {
                week: format!("{label} {}", idx + 1),
                volume: summary.total_volume,
                weight: summary.avg_weight,
                workouts: summary.total_workouts,
            }
        })
        .collect()
}
