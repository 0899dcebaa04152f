use sqlx::SqlitePool;
use sqlx::types::Json;

use super::lift_log::LiftLogRepository;
use super::{current_timestamp, live};
use crate::context::RequestContext;
use crate::error::{Result, StorageError};
use crate::models::Workout;
use crate::wod::ParsedWod;

const WORKOUT_COLUMNS: &str =
    "workout_id, user_id, name, description, wod_syntax, wod_parsed, created_at, deleted_at";

pub struct WorkoutRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WorkoutRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: Option<&str>,
        wod_syntax: Option<&str>,
        wod_parsed: Option<&ParsedWod>,
    ) -> Result<Workout> {
        let sql = format!(
            r#"
            INSERT INTO workouts (user_id, name, description, wod_syntax, wod_parsed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {WORKOUT_COLUMNS}
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(ctx.user_id)
            .bind(name.trim())
            .bind(description)
            .bind(wod_syntax)
            .bind(wod_parsed.map(Json))
            .fetch_one(self.pool)
            .await?;

        Ok(workout)
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Workout>> {
        let sql = format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = ?1 AND {}
            ORDER BY created_at DESC, workout_id DESC
            "#,
            live("workouts")
        );

        let workouts = sqlx::query_as::<_, Workout>(&sql)
            .bind(ctx.user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(workouts)
    }

    pub async fn find_owned(&self, ctx: &RequestContext, workout_id: i64) -> Result<Workout> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE workout_id = ?1 AND {}",
            live("workouts")
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(workout_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        if workout.user_id != ctx.user_id {
            return Err(StorageError::Forbidden);
        }

        Ok(workout)
    }

    /// Soft-deletes the workout and unlinks its lift logs in one transaction.
    /// Returns how many logs were unlinked.
    pub async fn soft_delete(&self, ctx: &RequestContext, workout_id: i64) -> Result<u64> {
        self.find_owned(ctx, workout_id).await?;

        let mut tx = self.pool.begin().await?;

        let detached = LiftLogRepository::detach_workout(&mut *tx, workout_id).await?;

        sqlx::query("UPDATE workouts SET deleted_at = ?1 WHERE workout_id = ?2")
            .bind(current_timestamp())
            .bind(workout_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(detached)
    }
}
