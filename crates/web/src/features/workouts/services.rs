use sqlx::SqlitePool;
use storage::{
    RequestContext,
    dto::workout::{CreateWorkoutRequest, ParseWodResponse, WorkoutResponse},
    error::Result,
    repository::workout::WorkoutRepository,
    services::{exercise_resolver::ExerciseResolver, workouts},
    wod::parse_wod,
};

/// Parses WOD text and matches each exercise line against the caller's
/// catalog. Line errors are part of the response, never a failure.
pub async fn parse(pool: &SqlitePool, ctx: &RequestContext, text: &str) -> Result<ParseWodResponse> {
    let parsed = parse_wod(text);
    let resolver = ExerciseResolver::load(pool, ctx).await?;

    Ok(ParseWodResponse::resolve(&parsed, &resolver))
}

pub async fn list_workouts(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<WorkoutResponse>> {
    let workouts = WorkoutRepository::new(pool).list(ctx).await?;
    Ok(workouts.into_iter().map(WorkoutResponse::from).collect())
}

pub async fn get_workout(pool: &SqlitePool, ctx: &RequestContext, workout_id: i64) -> Result<WorkoutResponse> {
    let workout = WorkoutRepository::new(pool).find_owned(ctx, workout_id).await?;
    Ok(WorkoutResponse::from(workout))
}

pub async fn create_workout(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateWorkoutRequest,
) -> Result<WorkoutResponse> {
    let workout = workouts::create_workout(pool, ctx, request).await?;
    Ok(WorkoutResponse::from(workout))
}

pub async fn delete_workout(pool: &SqlitePool, ctx: &RequestContext, workout_id: i64) -> Result<()> {
    let detached = WorkoutRepository::new(pool).soft_delete(ctx, workout_id).await?;
    tracing::debug!("Workout {} deleted, {} lift logs unlinked", workout_id, detached);
    Ok(())
}
