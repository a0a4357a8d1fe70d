use chrono::{DateTime, Utc};

/// Rest countdown as `m:ss`.
#[must_use]
pub fn format_rest(secs: u32) -> String {
    let minutes = secs / 60;
    let remainder = secs % 60;
    format!("{minutes}:{remainder:02}")
}

#[must_use]
pub fn format_workout_date(value: DateTime<Utc>) -> String {
    value.format("%A, %B %-d").to_string()
}
