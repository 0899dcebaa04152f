pub mod body_log;
pub mod exercise;
pub mod food_log;
pub mod lift_log;
pub mod personal_record;
pub mod user;
pub mod workout;

use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Soft-delete filter applied by every read of a soft-deletable table.
pub(crate) fn live(table: &str) -> String {
    format!("{table}.deleted_at IS NULL")
}

/// Current UTC time at second precision, the resolution all timestamps are stored at.
pub fn current_timestamp() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}
