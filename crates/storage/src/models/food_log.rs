use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Ingredient {
    pub ingredient_id: i64,
    pub user_id: i64,
    pub name: String,
    pub base_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FoodLog {
    pub food_log_id: i64,
    pub user_id: i64,
    pub ingredient_id: i64,
    pub quantity: f64,
    pub unit: String,
    pub logged_at: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
