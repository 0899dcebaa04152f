pub mod exercise_resolver;
pub mod lift_logs;
pub mod one_rep_max;
pub mod personal_records;
pub mod workouts;
