use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, show_global_exercises: bool) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, show_global_exercises)
            VALUES (?1, ?2)
            RETURNING user_id, name, show_global_exercises, created_at
            "#,
        )
        .bind(name)
        .bind(show_global_exercises)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, show_global_exercises, created_at
            FROM users
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn set_show_global_exercises(&self, user_id: i64, show: bool) -> Result<()> {
        let result = sqlx::query("UPDATE users SET show_global_exercises = ?1 WHERE user_id = ?2")
            .bind(show)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
