use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::wod::ParsedWod;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub workout_id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub wod_syntax: Option<String>,
    pub wod_parsed: Option<Json<ParsedWod>>,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}
