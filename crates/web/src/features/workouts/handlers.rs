use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database, RequestContext,
    dto::workout::{CreateWorkoutRequest, ParseWodRequest, ParseWodResponse, WorkoutResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/workouts/parse",
    request_body = ParseWodRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Parsed blocks; bad lines carry an inline error", body = ParseWodResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn parse_wod(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<ParseWodRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let parsed = services::parse(db.pool(), &ctx, &req.text).await?;

    Ok(Json(parsed).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's workouts, newest first", body = Vec<WorkoutResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn list_workouts(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let workouts = services::list_workouts(db.pool(), &ctx).await?;

    Ok(Json(workouts).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = CreateWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Workout created", body = WorkoutResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn create_workout(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let workout = services::create_workout(db.pool(), &ctx, &req).await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/{id}",
    params(
        ("id" = i64, Path, description = "Workout id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Workout found", body = WorkoutResponse),
        (status = 403, description = "Workout belongs to someone else"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn get_workout(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let workout = services::get_workout(db.pool(), &ctx, id).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}",
    params(
        ("id" = i64, Path, description = "Workout id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Workout deleted; its lift logs are kept and unlinked"),
        (status = 403, description = "Workout belongs to someone else"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn delete_workout(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_workout(db.pool(), &ctx, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
