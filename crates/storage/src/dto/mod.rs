pub mod catalog;
pub mod common;
pub mod exercise;
pub mod import;
pub mod lift_log;
pub mod workout;
