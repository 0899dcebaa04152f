use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row per PR event. Rows are only ever removed by the historical
/// recompute, which rebuilds them for the pair it replays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PersonalRecord {
    pub personal_record_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub lift_log_id: i64,
    pub one_rep_max: f64,
    pub previous_one_rep_max: Option<f64>,
    pub achieved_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}
