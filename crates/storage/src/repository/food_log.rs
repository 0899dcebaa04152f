use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::context::RequestContext;
use crate::error::{Result, StorageError};
use crate::models::{FoodLog, Ingredient};

const FOOD_LOG_COLUMNS: &str =
    "food_log_id, user_id, ingredient_id, quantity, unit, logged_at, notes, created_at";

#[derive(Debug, Clone)]
pub struct NewFoodLog<'r> {
    pub ingredient_id: i64,
    pub quantity: f64,
    pub unit: &'r str,
    pub logged_at: NaiveDateTime,
    pub notes: Option<&'r str>,
}

pub struct FoodLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FoodLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_ingredients(&self, ctx: &RequestContext) -> Result<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT ingredient_id, user_id, name, base_unit
            FROM ingredients
            WHERE user_id = ?1
            ORDER BY name
            "#,
        )
        .bind(ctx.user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ingredients)
    }

    pub async fn create_ingredient(
        &self,
        ctx: &RequestContext,
        name: &str,
        base_unit: &str,
    ) -> Result<Ingredient> {
        let name = name.trim();
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, base_unit)
            VALUES (?1, ?2, ?3)
            RETURNING ingredient_id, user_id, name, base_unit
            "#,
        )
        .bind(ctx.user_id)
        .bind(name)
        .bind(base_unit.trim())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation(format!("Ingredient '{}' already exists", name))
        })?;

        Ok(ingredient)
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<FoodLog>> {
        let sql = format!(
            "SELECT {FOOD_LOG_COLUMNS} FROM food_logs WHERE user_id = ?1 ORDER BY logged_at DESC, food_log_id DESC"
        );

        let logs = sqlx::query_as::<_, FoodLog>(&sql)
            .bind(ctx.user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(logs)
    }

    pub async fn exists(
        &self,
        ctx: &RequestContext,
        ingredient_id: i64,
        logged_at: NaiveDateTime,
        quantity: f64,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM food_logs
                WHERE user_id = ?1 AND ingredient_id = ?2 AND logged_at = ?3 AND quantity = ?4
            )
            "#,
        )
        .bind(ctx.user_id)
        .bind(ingredient_id)
        .bind(logged_at)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn insert(&self, ctx: &RequestContext, log: &NewFoodLog<'_>) -> Result<FoodLog> {
        let sql = format!(
            r#"
            INSERT INTO food_logs (user_id, ingredient_id, quantity, unit, logged_at, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {FOOD_LOG_COLUMNS}
            "#
        );

        let food_log = sqlx::query_as::<_, FoodLog>(&sql)
            .bind(ctx.user_id)
            .bind(log.ingredient_id)
            .bind(log.quantity)
            .bind(log.unit)
            .bind(log.logged_at)
            .bind(log.notes)
            .fetch_one(self.pool)
            .await?;

        Ok(food_log)
    }
}
