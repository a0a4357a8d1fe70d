use fit_core::model::{Exercise, User, WeeklyProgress, Workout};

use crate::vm::time_fmt::format_workout_date;

/// One exercise line on the today card.
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseRowVm {
    pub name: String,
    pub detail: String,
    pub completed: bool,
}

/// Today's workout, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutCardVm {
    pub name: String,
    pub date_label: String,
    pub status_label: &'static str,
    pub exercises: Vec<ExerciseRowVm>,
    pub completed_label: String,
    pub progress_percent: u32,
    pub can_start: bool,
}

/// A chart bar scaled against the tallest bar in its series.
#[derive(Clone, Debug, PartialEq)]
pub struct BarVm {
    pub label: String,
    pub value: f64,
    pub height_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingVm {
    pub title: String,
    pub initial: String,
    pub streak_label: String,
    pub total_label: String,
}

#[must_use]
pub fn map_greeting(user: Option<&User>) -> GreetingVm {
    match user {
        Some(user) => GreetingVm {
            title: format!("Welcome back, {}!", user.name),
            initial: user.initial(),
            streak_label: format!("{} day streak", user.streak),
            total_label: format!("{} workouts", user.total_workouts),
        },
        None => GreetingVm {
            title: "Welcome back!".to_owned(),
            initial: String::new(),
            streak_label: "0 day streak".to_owned(),
            total_label: "0 workouts".to_owned(),
        },
    }
}

#[must_use]
pub fn format_exercise_detail(exercise: &Exercise) -> String {
    let sets = exercise.sets();
    let reps = exercise.reps();
    if exercise.weight_kg() > 0.0 {
        format!("{sets} × {reps} × {} kg", exercise.weight_kg())
    } else {
        format!("{sets} × {reps}")
    }
}

#[must_use]
pub fn map_workout_card(workout: &Workout) -> WorkoutCardVm {
    let exercises = workout
        .exercises()
        .iter()
        .map(|exercise| ExerciseRowVm {
            name: exercise.name().to_owned(),
            detail: format_exercise_detail(exercise),
            completed: exercise.is_completed(),
        })
        .collect::<Vec<_>>();
    let total = exercises.len();
    let done = workout.completed_exercise_count();

    WorkoutCardVm {
        name: workout.name().to_owned(),
        date_label: format_workout_date(workout.date()),
        status_label: workout.status().as_str(),
        completed_label: format!("{done}/{total} exercises"),
        progress_percent: percent(workout.progress()),
        can_start: total > 0 && done < total,
        exercises,
    }
}

/// Volume bars, each relative to the largest week. An all-zero series yields
/// zero-height bars.
#[must_use]
pub fn map_volume_bars(weeks: &[WeeklyProgress]) -> Vec<BarVm> {
    let max = weeks.iter().map(|w| w.volume).fold(0.0, f64::max);
    weeks
        .iter()
        .map(|week| BarVm {
            label: week.week.clone(),
            value: week.volume,
            height_percent: if max > 0.0 {
                percent(week.volume / max * 100.0)
            } else {
                0
            },
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn percent(value: f64) -> u32 {
    value.clamp(0.0, 100.0).round() as u32
}
