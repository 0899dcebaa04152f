use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::exercise::ExerciseRepository;
use super::{current_timestamp, live};
use crate::context::RequestContext;
use crate::dto::common::PaginationParams;
use crate::dto::lift_log::{CreateLiftLogRequest, CreateLiftSetRequest};
use crate::error::{Result, StorageError};
use crate::models::{Exercise, LiftLog, LiftLogWithSets, LiftSet};

const LOG_COLUMNS: &str = "lift_log_id, user_id, exercise_id, workout_id, logged_at, comments, \
     is_pr, pr_count, pr_evaluated_at, created_at, deleted_at";

const SET_COLUMNS: &str = "lift_set_id, lift_log_id, position, weight, reps, band_color, notes";

const JOINED_SET_COLUMNS: &str = "lift_sets.lift_set_id, lift_sets.lift_log_id, lift_sets.position, \
     lift_sets.weight, lift_sets.reps, lift_sets.band_color, lift_sets.notes";

// Keeps IN (...) lists well under SQLite's bound-parameter limit.
const HYDRATE_CHUNK: usize = 500;

pub struct LiftLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LiftLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, lift_log_id: i64) -> Result<LiftLogWithSets> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM lift_logs WHERE lift_log_id = ?1 AND {}",
            live("lift_logs")
        );

        let log = sqlx::query_as::<_, LiftLog>(&sql)
            .bind(lift_log_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        self.hydrate(vec![log])
            .await?
            .pop()
            .ok_or(StorageError::NotFound)
    }

    /// Like `find`, but another user's log is forbidden rather than visible.
    pub async fn find_owned(&self, ctx: &RequestContext, lift_log_id: i64) -> Result<LiftLogWithSets> {
        let entry = self.find(lift_log_id).await?;
        if entry.log.user_id != ctx.user_id {
            return Err(StorageError::Forbidden);
        }
        Ok(entry)
    }

    /// Newest first. Returns the page and the total number of matching logs.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        exercise_id: Option<i64>,
        pagination: &PaginationParams,
    ) -> Result<(Vec<LiftLogWithSets>, i64)> {
        let filter = format!(
            "user_id = ?1 AND (?2 IS NULL OR exercise_id = ?2) AND {}",
            live("lift_logs")
        );

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM lift_logs WHERE {filter}"))
            .bind(ctx.user_id)
            .bind(exercise_id)
            .fetch_one(self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM lift_logs
            WHERE {filter}
            ORDER BY logged_at DESC, lift_log_id DESC
            LIMIT ?3 OFFSET ?4
            "#
        );

        let logs = sqlx::query_as::<_, LiftLog>(&sql)
            .bind(ctx.user_id)
            .bind(exercise_id)
            .bind(i64::from(pagination.limit()))
            .bind(i64::from(pagination.offset()))
            .fetch_all(self.pool)
            .await?;

        Ok((self.hydrate(logs).await?, total))
    }

    pub async fn exists_at(
        &self,
        user_id: i64,
        exercise_id: i64,
        logged_at: NaiveDateTime,
    ) -> Result<bool> {
        let sql = format!(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM lift_logs
                WHERE user_id = ?1 AND exercise_id = ?2 AND logged_at = ?3 AND {}
            )
            "#,
            live("lift_logs")
        );

        let exists: bool = sqlx::query_scalar(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .bind(logged_at)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn count_live(&self, user_id: Option<i64>, exercise_id: Option<i64>) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*) FROM lift_logs
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR exercise_id = ?2)
              AND {}
            "#,
            live("lift_logs")
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Distinct (user, exercise) pairs with live logs or stored PR rows,
    /// optionally scoped. A pair whose logs were all deleted still shows up
    /// while it has records left to clear.
    pub async fn history_pairs(
        &self,
        user_id: Option<i64>,
        exercise_id: Option<i64>,
    ) -> Result<Vec<(i64, i64)>> {
        let sql = format!(
            r#"
            SELECT user_id, exercise_id FROM lift_logs
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR exercise_id = ?2)
              AND {}
            UNION
            SELECT user_id, exercise_id FROM personal_records
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR exercise_id = ?2)
            ORDER BY user_id, exercise_id
            "#,
            live("lift_logs")
        );

        let pairs = sqlx::query_as::<_, (i64, i64)>(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .fetch_all(self.pool)
            .await?;

        Ok(pairs)
    }

    /// Every live log for the pair in replay order: `logged_at`, then id.
    pub async fn history(&self, user_id: i64, exercise_id: i64) -> Result<Vec<LiftLogWithSets>> {
        let sql = format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM lift_logs
            WHERE user_id = ?1 AND exercise_id = ?2 AND {}
            ORDER BY logged_at, lift_log_id
            "#,
            live("lift_logs")
        );

        let logs = sqlx::query_as::<_, LiftLog>(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .fetch_all(self.pool)
            .await?;

        self.hydrate(logs).await
    }

    pub async fn soft_delete(&self, ctx: &RequestContext, lift_log_id: i64) -> Result<()> {
        self.find_owned(ctx, lift_log_id).await?;

        sqlx::query("UPDATE lift_logs SET deleted_at = ?1 WHERE lift_log_id = ?2")
            .bind(current_timestamp())
            .bind(lift_log_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    async fn hydrate(&self, logs: Vec<LiftLog>) -> Result<Vec<LiftLogWithSets>> {
        if logs.is_empty() {
            return Ok(Vec::new());
        }

        let mut sets_by_log: HashMap<i64, Vec<LiftSet>> = HashMap::new();
        let ids: Vec<i64> = logs.iter().map(|log| log.lift_log_id).collect();

        for chunk in ids.chunks(HYDRATE_CHUNK) {
            let mut builder =
                QueryBuilder::<Sqlite>::new(format!("SELECT {SET_COLUMNS} FROM lift_sets WHERE lift_log_id IN ("));
            {
                let mut separated = builder.separated(", ");
                for id in chunk {
                    separated.push_bind(*id);
                }
            }
            builder.push(") ORDER BY lift_log_id, position");

            let sets = builder
                .build_query_as::<LiftSet>()
                .fetch_all(self.pool)
                .await?;
            for set in sets {
                sets_by_log.entry(set.lift_log_id).or_default().push(set);
            }
        }

        let exercises = ExerciseRepository::new(self.pool);
        let mut exercise_cache: HashMap<i64, Exercise> = HashMap::new();
        let mut hydrated = Vec::with_capacity(logs.len());

        for log in logs {
            let exercise = match exercise_cache.get(&log.exercise_id) {
                Some(exercise) => exercise.clone(),
                None => {
                    let exercise = exercises.find_including_deleted(log.exercise_id).await?;
                    exercise_cache.insert(log.exercise_id, exercise.clone());
                    exercise
                }
            };
            let sets = sets_by_log.remove(&log.lift_log_id).unwrap_or_default();
            hydrated.push(LiftLogWithSets { log, exercise, sets });
        }

        Ok(hydrated)
    }

    pub async fn insert_log(
        conn: &mut SqliteConnection,
        user_id: i64,
        request: &CreateLiftLogRequest,
        logged_at: NaiveDateTime,
    ) -> Result<LiftLog> {
        let sql = format!(
            r#"
            INSERT INTO lift_logs (user_id, exercise_id, workout_id, logged_at, comments)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {LOG_COLUMNS}
            "#
        );

        let log = sqlx::query_as::<_, LiftLog>(&sql)
            .bind(user_id)
            .bind(request.exercise_id)
            .bind(request.workout_id)
            .bind(logged_at)
            .bind(&request.comments)
            .fetch_one(&mut *conn)
            .await?;

        Ok(log)
    }

    pub async fn insert_set(
        conn: &mut SqliteConnection,
        lift_log_id: i64,
        position: i32,
        set: &CreateLiftSetRequest,
    ) -> Result<LiftSet> {
        let sql = format!(
            r#"
            INSERT INTO lift_sets (lift_log_id, position, weight, reps, band_color, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {SET_COLUMNS}
            "#
        );

        let set = sqlx::query_as::<_, LiftSet>(&sql)
            .bind(lift_log_id)
            .bind(position)
            .bind(set.weight)
            .bind(set.reps)
            .bind(&set.band_color)
            .bind(&set.notes)
            .fetch_one(&mut *conn)
            .await?;

        Ok(set)
    }

    /// Sets of every live log for the pair logged at or before `logged_at`.
    /// Called before the new log is inserted, so ties on the timestamp all
    /// belong to earlier ids.
    pub async fn sets_logged_up_to(
        conn: &mut SqliteConnection,
        user_id: i64,
        exercise_id: i64,
        logged_at: NaiveDateTime,
    ) -> Result<Vec<LiftSet>> {
        let sql = format!(
            r#"
            SELECT {JOINED_SET_COLUMNS}
            FROM lift_sets
            JOIN lift_logs ON lift_logs.lift_log_id = lift_sets.lift_log_id
            WHERE lift_logs.user_id = ?1
              AND lift_logs.exercise_id = ?2
              AND lift_logs.logged_at <= ?3
              AND {}
            "#,
            live("lift_logs")
        );

        let sets = sqlx::query_as::<_, LiftSet>(&sql)
            .bind(user_id)
            .bind(exercise_id)
            .bind(logged_at)
            .fetch_all(&mut *conn)
            .await?;

        Ok(sets)
    }

    pub async fn update_pr_flags(
        conn: &mut SqliteConnection,
        lift_log_id: i64,
        is_pr: bool,
        pr_count: i32,
        evaluated_at: NaiveDateTime,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE lift_logs
            SET is_pr = ?1, pr_count = ?2, pr_evaluated_at = ?3
            WHERE lift_log_id = ?4
            "#,
        )
        .bind(is_pr)
        .bind(pr_count)
        .bind(evaluated_at)
        .bind(lift_log_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Unlinks logs from a workout that is being deleted.
    pub async fn detach_workout(conn: &mut SqliteConnection, workout_id: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE lift_logs SET workout_id = NULL WHERE workout_id = ?1")
            .bind(workout_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
