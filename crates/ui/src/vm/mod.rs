mod dashboard_vm;
mod progress_vm;
mod session_vm;
mod time_fmt;

pub use dashboard_vm::{
    BarVm, ExerciseRowVm, GreetingVm, WorkoutCardVm, format_exercise_detail, map_greeting,
    map_volume_bars, map_workout_card,
};
pub use progress_vm::{ProgressVm, StatCardVm, map_progress, map_stat_cards};
pub use session_vm::{
    CurrentExerciseVm, RestVm, SessionHeaderVm, SessionIntent, SessionVm, UPCOMING_PREVIEW,
};
pub use time_fmt::{format_rest, format_workout_date};
