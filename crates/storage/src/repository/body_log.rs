use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::context::RequestContext;
use crate::error::{Result, StorageError};
use crate::models::{BodyLog, MeasurementType};

const BODY_LOG_COLUMNS: &str =
    "body_log_id, user_id, measurement_type_id, value, unit, logged_at, comments, created_at";

#[derive(Debug, Clone)]
pub struct NewBodyLog<'r> {
    pub measurement_type_id: i64,
    pub value: f64,
    pub unit: &'r str,
    pub logged_at: NaiveDateTime,
    pub comments: Option<&'r str>,
}

pub struct BodyLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BodyLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_measurement_types(&self, ctx: &RequestContext) -> Result<Vec<MeasurementType>> {
        let types = sqlx::query_as::<_, MeasurementType>(
            r#"
            SELECT measurement_type_id, user_id, name, default_unit
            FROM measurement_types
            WHERE user_id = ?1
            ORDER BY name
            "#,
        )
        .bind(ctx.user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(types)
    }

    pub async fn create_measurement_type(
        &self,
        ctx: &RequestContext,
        name: &str,
        default_unit: &str,
    ) -> Result<MeasurementType> {
        let name = name.trim();
        let measurement_type = sqlx::query_as::<_, MeasurementType>(
            r#"
            INSERT INTO measurement_types (user_id, name, default_unit)
            VALUES (?1, ?2, ?3)
            RETURNING measurement_type_id, user_id, name, default_unit
            "#,
        )
        .bind(ctx.user_id)
        .bind(name)
        .bind(default_unit.trim())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e)
                .on_unique_violation(format!("Measurement type '{}' already exists", name))
        })?;

        Ok(measurement_type)
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<BodyLog>> {
        let sql = format!(
            "SELECT {BODY_LOG_COLUMNS} FROM body_logs WHERE user_id = ?1 ORDER BY logged_at DESC, body_log_id DESC"
        );

        let logs = sqlx::query_as::<_, BodyLog>(&sql)
            .bind(ctx.user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(logs)
    }

    pub async fn exists_at(
        &self,
        ctx: &RequestContext,
        measurement_type_id: i64,
        logged_at: NaiveDateTime,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM body_logs
                WHERE user_id = ?1 AND measurement_type_id = ?2 AND logged_at = ?3
            )
            "#,
        )
        .bind(ctx.user_id)
        .bind(measurement_type_id)
        .bind(logged_at)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn insert(&self, ctx: &RequestContext, log: &NewBodyLog<'_>) -> Result<BodyLog> {
        let sql = format!(
            r#"
            INSERT INTO body_logs (user_id, measurement_type_id, value, unit, logged_at, comments)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {BODY_LOG_COLUMNS}
            "#
        );

        let body_log = sqlx::query_as::<_, BodyLog>(&sql)
            .bind(ctx.user_id)
            .bind(log.measurement_type_id)
            .bind(log.value)
            .bind(log.unit)
            .bind(log.logged_at)
            .bind(log.comments)
            .fetch_one(self.pool)
            .await?;

        Ok(body_log)
    }
}
