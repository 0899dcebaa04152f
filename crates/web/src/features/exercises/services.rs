use std::collections::HashMap;

use sqlx::SqlitePool;
use storage::{
    RequestContext,
    dto::exercise::{CreateExerciseRequest, ExerciseResponse, ResolveExerciseResponse},
    error::Result,
    models::PersonalRecord,
    repository::{
        exercise::ExerciseRepository, personal_record::PersonalRecordRepository,
        user::UserRepository,
    },
    services::exercise_resolver::{ExerciseResolver, Resolution},
};

/// Exercises the caller can log against, with their aliases applied
pub async fn list_exercises(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<ExerciseResponse>> {
    let user = UserRepository::new(pool).find_by_id(ctx.user_id).await?;
    let repo = ExerciseRepository::new(pool);

    let aliases: HashMap<i64, String> = repo
        .list_aliases(ctx)
        .await?
        .into_iter()
        .map(|alias| (alias.exercise_id, alias.alias_name))
        .collect();

    let exercises = repo.list_visible(ctx, user.show_global_exercises).await?;

    Ok(exercises
        .into_iter()
        .map(|exercise| {
            let alias = aliases.get(&exercise.exercise_id).map(String::as_str);
            ExerciseResponse::new(exercise, alias)
        })
        .collect())
}

pub async fn create_exercise(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateExerciseRequest,
) -> Result<ExerciseResponse> {
    let exercise = ExerciseRepository::new(pool).create(ctx, request).await?;
    Ok(ExerciseResponse::new(exercise, None))
}

pub async fn delete_exercise(pool: &SqlitePool, ctx: &RequestContext, exercise_id: i64) -> Result<()> {
    ExerciseRepository::new(pool).soft_delete(ctx, exercise_id).await
}

pub async fn set_alias(
    pool: &SqlitePool,
    ctx: &RequestContext,
    exercise_id: i64,
    alias_name: &str,
) -> Result<ExerciseResponse> {
    let repo = ExerciseRepository::new(pool);
    let alias = repo.upsert_alias(ctx, exercise_id, alias_name).await?;
    let exercise = repo.find_visible(ctx, exercise_id).await?;

    Ok(ExerciseResponse::new(exercise, Some(&alias.alias_name)))
}

pub async fn resolve_exercise(
    pool: &SqlitePool,
    ctx: &RequestContext,
    name: &str,
) -> Result<ResolveExerciseResponse> {
    let resolver = ExerciseResolver::load(pool, ctx).await?;

    let response = match resolver.resolve(name) {
        Resolution::Matched(found) => ResolveExerciseResponse {
            query: name.to_string(),
            matched: true,
            exercise_id: Some(found.exercise_id),
            display_name: Some(found.display_name),
            via_alias: found.via_alias,
        },
        Resolution::Unmatched => ResolveExerciseResponse {
            query: name.to_string(),
            matched: false,
            exercise_id: None,
            display_name: None,
            via_alias: false,
        },
    };

    Ok(response)
}

/// PR history for one exercise, oldest first
pub async fn list_personal_records(
    pool: &SqlitePool,
    ctx: &RequestContext,
    exercise_id: i64,
) -> Result<Vec<PersonalRecord>> {
    ExerciseRepository::new(pool)
        .find_visible(ctx, exercise_id)
        .await?;

    PersonalRecordRepository::new(pool)
        .list_for(ctx, Some(exercise_id))
        .await
}
