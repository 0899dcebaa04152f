pub mod catalog;
pub mod exercises;
pub mod imports;
pub mod lift_logs;
pub mod workouts;
