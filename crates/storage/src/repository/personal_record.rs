use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};

use super::live;
use crate::context::RequestContext;
use crate::error::Result;
use crate::models::PersonalRecord;

const RECORD_COLUMNS: &str = "personal_record_id, user_id, exercise_id, lift_log_id, one_rep_max, \
     previous_one_rep_max, achieved_at, created_at";

#[derive(Debug, Clone)]
pub struct NewPersonalRecord {
    pub user_id: i64,
    pub exercise_id: i64,
    pub lift_log_id: i64,
    pub one_rep_max: f64,
    pub previous_one_rep_max: Option<f64>,
    pub achieved_at: NaiveDateTime,
}

pub struct PersonalRecordRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PersonalRecordRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for(
        &self,
        ctx: &RequestContext,
        exercise_id: Option<i64>,
    ) -> Result<Vec<PersonalRecord>> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM personal_records
            WHERE user_id = ?1
              AND (?2 IS NULL OR exercise_id = ?2)
              AND EXISTS (
                  SELECT 1 FROM lift_logs
                  WHERE lift_logs.lift_log_id = personal_records.lift_log_id AND {}
              )
            ORDER BY achieved_at, personal_record_id
            "#,
            live("lift_logs")
        );

        let records = sqlx::query_as::<_, PersonalRecord>(&sql)
            .bind(ctx.user_id)
            .bind(exercise_id)
            .fetch_all(self.pool)
            .await?;

        Ok(records)
    }

    pub async fn insert(conn: &mut SqliteConnection, record: &NewPersonalRecord) -> Result<PersonalRecord> {
        let sql = format!(
            r#"
            INSERT INTO personal_records
                (user_id, exercise_id, lift_log_id, one_rep_max, previous_one_rep_max, achieved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, PersonalRecord>(&sql)
            .bind(record.user_id)
            .bind(record.exercise_id)
            .bind(record.lift_log_id)
            .bind(record.one_rep_max)
            .bind(record.previous_one_rep_max)
            .bind(record.achieved_at)
            .fetch_one(&mut *conn)
            .await?;

        Ok(record)
    }

    pub async fn delete_for_pair(
        conn: &mut SqliteConnection,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM personal_records WHERE user_id = ?1 AND exercise_id = ?2")
                .bind(user_id)
                .bind(exercise_id)
                .execute(&mut *conn)
                .await?;

        Ok(result.rows_affected())
    }
}
