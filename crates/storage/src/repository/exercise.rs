use sqlx::SqlitePool;

use super::user::UserRepository;
use super::{current_timestamp, live};
use crate::context::RequestContext;
use crate::dto::exercise::CreateExerciseRequest;
use crate::error::{Result, StorageError};
use crate::models::{BandType, Exercise, ExerciseAlias, effective_bodyweight};

const EXERCISE_COLUMNS: &str = "exercise_id, user_id, title, description, exercise_type, \
     is_bodyweight, band_type, created_at, deleted_at";

const ALIAS_COLUMNS: &str = "exercise_alias_id, user_id, exercise_id, alias_name, created_at";

pub struct ExerciseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ExerciseRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// The caller's own exercises, plus shared ones when `include_global`
    pub async fn list_visible(
        &self,
        ctx: &RequestContext,
        include_global: bool,
    ) -> Result<Vec<Exercise>> {
        let sql = format!(
            r#"
            SELECT {EXERCISE_COLUMNS}
            FROM exercises
            WHERE {}
              AND (user_id = ?1 OR (?2 AND user_id IS NULL))
            ORDER BY title, exercise_id
            "#,
            live("exercises")
        );

        let exercises = sqlx::query_as::<_, Exercise>(&sql)
            .bind(ctx.user_id)
            .bind(include_global)
            .fetch_all(self.pool)
            .await?;

        Ok(exercises)
    }

    pub async fn find_live(&self, exercise_id: i64) -> Result<Exercise> {
        let sql = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE exercise_id = ?1 AND {}",
            live("exercises")
        );

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(exercise_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    /// Historical logs still point at soft-deleted exercises, so history
    /// readers bypass the live filter here.
    pub async fn find_including_deleted(&self, exercise_id: i64) -> Result<Exercise> {
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE exercise_id = ?1");

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(exercise_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    /// Own or global exercise; another user's exercise is forbidden. Global
    /// exercises read as missing for users who hide them.
    pub async fn find_visible(&self, ctx: &RequestContext, exercise_id: i64) -> Result<Exercise> {
        let exercise = self.find_live(exercise_id).await?;

        if exercise.is_global() {
            let user = UserRepository::new(self.pool).find_by_id(ctx.user_id).await?;
            if !user.show_global_exercises {
                return Err(StorageError::NotFound);
            }
            return Ok(exercise);
        }

        if ctx.owns(exercise.user_id) {
            Ok(exercise)
        } else {
            Err(StorageError::Forbidden)
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &CreateExerciseRequest,
    ) -> Result<Exercise> {
        self.insert(Some(ctx.user_id), request).await
    }

    pub async fn create_global(&self, request: &CreateExerciseRequest) -> Result<Exercise> {
        self.insert(None, request).await
    }

    async fn insert(&self, owner: Option<i64>, request: &CreateExerciseRequest) -> Result<Exercise> {
        let sql = format!(
            r#"
            INSERT INTO exercises (user_id, title, description, exercise_type, is_bodyweight, band_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {EXERCISE_COLUMNS}
            "#
        );

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(owner)
            .bind(request.title.trim())
            .bind(&request.description)
            .bind(request.exercise_type)
            .bind(effective_bodyweight(request.is_bodyweight, request.band_type))
            .bind(request.band_type)
            .fetch_one(self.pool)
            .await?;

        Ok(exercise)
    }

    pub async fn update_details(
        &self,
        ctx: &RequestContext,
        exercise_id: i64,
        description: Option<&str>,
        is_bodyweight: bool,
        band_type: Option<BandType>,
    ) -> Result<Exercise> {
        let existing = self.find_live(exercise_id).await?;
        if !ctx.owns(existing.user_id) {
            return Err(StorageError::Forbidden);
        }

        let sql = format!(
            r#"
            UPDATE exercises
            SET description = ?1, is_bodyweight = ?2, band_type = ?3
            WHERE exercise_id = ?4
            RETURNING {EXERCISE_COLUMNS}
            "#
        );

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(description)
            .bind(effective_bodyweight(is_bodyweight, band_type))
            .bind(band_type)
            .bind(exercise_id)
            .fetch_one(self.pool)
            .await?;

        Ok(exercise)
    }

    /// Only the owner may delete; shared exercises cannot be deleted by users.
    pub async fn soft_delete(&self, ctx: &RequestContext, exercise_id: i64) -> Result<()> {
        let existing = self.find_live(exercise_id).await?;
        if !ctx.owns(existing.user_id) {
            return Err(StorageError::Forbidden);
        }

        sqlx::query("UPDATE exercises SET deleted_at = ?1 WHERE exercise_id = ?2")
            .bind(current_timestamp())
            .bind(exercise_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_aliases(&self, ctx: &RequestContext) -> Result<Vec<ExerciseAlias>> {
        let sql = format!(
            "SELECT {ALIAS_COLUMNS} FROM exercise_aliases WHERE user_id = ?1 ORDER BY exercise_id"
        );

        let aliases = sqlx::query_as::<_, ExerciseAlias>(&sql)
            .bind(ctx.user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(aliases)
    }

    pub async fn find_alias(
        &self,
        ctx: &RequestContext,
        exercise_id: i64,
    ) -> Result<Option<ExerciseAlias>> {
        let sql = format!(
            "SELECT {ALIAS_COLUMNS} FROM exercise_aliases WHERE user_id = ?1 AND exercise_id = ?2"
        );

        let alias = sqlx::query_as::<_, ExerciseAlias>(&sql)
            .bind(ctx.user_id)
            .bind(exercise_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(alias)
    }

    pub async fn upsert_alias(
        &self,
        ctx: &RequestContext,
        exercise_id: i64,
        alias_name: &str,
    ) -> Result<ExerciseAlias> {
        self.find_visible(ctx, exercise_id).await?;

        let sql = format!(
            r#"
            INSERT INTO exercise_aliases (user_id, exercise_id, alias_name)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_id, exercise_id)
            DO UPDATE SET alias_name = excluded.alias_name
            RETURNING {ALIAS_COLUMNS}
            "#
        );

        let alias = sqlx::query_as::<_, ExerciseAlias>(&sql)
            .bind(ctx.user_id)
            .bind(exercise_id)
            .bind(alias_name.trim())
            .fetch_one(self.pool)
            .await?;

        Ok(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_user, exercise_request, setup_test_db};

    #[tokio::test]
    async fn test_band_type_forces_bodyweight_off() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let repo = ExerciseRepository::new(db.pool());

        let mut request = exercise_request("Banded Pull-up");
        request.is_bodyweight = true;
        request.band_type = Some(BandType::Assistance);

        let exercise = repo.create(&ctx, &request).await.unwrap();
        assert!(!exercise.is_bodyweight);
        assert_eq!(exercise.band_type, Some(BandType::Assistance));

        let updated = repo
            .update_details(&ctx, exercise.exercise_id, None, true, Some(BandType::Resistance))
            .await
            .unwrap();
        assert!(!updated.is_bodyweight);
    }

    #[tokio::test]
    async fn test_visibility_respects_global_preference_and_soft_delete() {
        let db = setup_test_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let ctx = RequestContext::new(alice.user_id);
        let repo = ExerciseRepository::new(db.pool());

        repo.create_global(&exercise_request("Deadlift")).await.unwrap();
        let own = repo.create(&ctx, &exercise_request("Zercher Squat")).await.unwrap();
        let foreign = repo
            .create(&RequestContext::new(bob.user_id), &exercise_request("Bob Press"))
            .await
            .unwrap();

        assert_eq!(repo.list_visible(&ctx, true).await.unwrap().len(), 2);
        assert_eq!(repo.list_visible(&ctx, false).await.unwrap().len(), 1);

        assert!(matches!(
            repo.find_visible(&ctx, foreign.exercise_id).await,
            Err(StorageError::Forbidden)
        ));

        repo.soft_delete(&ctx, own.exercise_id).await.unwrap();
        assert_eq!(repo.list_visible(&ctx, true).await.unwrap().len(), 1);
        assert!(matches!(
            repo.find_live(own.exercise_id).await,
            Err(StorageError::NotFound)
        ));
        assert!(repo.find_including_deleted(own.exercise_id).await.unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_hidden_global_exercise_is_not_visible() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let repo = ExerciseRepository::new(db.pool());
        let deadlift = repo.create_global(&exercise_request("Deadlift")).await.unwrap();

        assert!(repo.find_visible(&ctx, deadlift.exercise_id).await.is_ok());

        UserRepository::new(db.pool())
            .set_show_global_exercises(user.user_id, false)
            .await
            .unwrap();
        assert!(matches!(
            repo.find_visible(&ctx, deadlift.exercise_id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_alias_is_unique_per_user_and_exercise() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let repo = ExerciseRepository::new(db.pool());
        let squat = repo.create_global(&exercise_request("Back Squat")).await.unwrap();

        repo.upsert_alias(&ctx, squat.exercise_id, "Squats").await.unwrap();
        repo.upsert_alias(&ctx, squat.exercise_id, "Big Squat").await.unwrap();

        let aliases = repo.list_aliases(&ctx).await.unwrap();
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0].alias_name, "Big Squat");
    }

    #[tokio::test]
    async fn test_cannot_delete_global_exercise() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let repo = ExerciseRepository::new(db.pool());
        let global = repo.create_global(&exercise_request("Bench Press")).await.unwrap();

        let result = repo
            .soft_delete(&RequestContext::new(user.user_id), global.exercise_id)
            .await;
        assert!(matches!(result, Err(StorageError::Forbidden)));
    }
}
