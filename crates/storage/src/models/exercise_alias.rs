use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Per-user display name for an exercise. At most one per (user, exercise).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseAlias {
    pub exercise_alias_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub alias_name: String,
    pub created_at: NaiveDateTime,
}
