use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MeasurementType {
    pub measurement_type_id: i64,
    pub user_id: i64,
    pub name: String,
    pub default_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BodyLog {
    pub body_log_id: i64,
    pub user_id: i64,
    pub measurement_type_id: i64,
    pub value: f64,
    pub unit: String,
    pub logged_at: NaiveDateTime,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}
