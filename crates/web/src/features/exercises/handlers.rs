use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database, RequestContext,
    dto::exercise::{
        CreateExerciseRequest, ExerciseResponse, ResolveExerciseParams, ResolveExerciseResponse,
        SetAliasRequest,
    },
    models::PersonalRecord,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercises",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Own exercises, plus shared ones if enabled", body = Vec<ExerciseResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn list_exercises(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let exercises = services::list_exercises(db.pool(), &ctx).await?;

    Ok(Json(exercises).into_response())
}

#[utoipa::path(
    post,
    path = "/api/exercises",
    request_body = CreateExerciseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Exercise created successfully", body = ExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn create_exercise(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateExerciseRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let exercise = services::create_exercise(db.pool(), &ctx, &req).await?;

    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/exercises/{id}",
    params(
        ("id" = i64, Path, description = "Exercise id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Exercise deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Exercise belongs to someone else"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn delete_exercise(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_exercise(db.pool(), &ctx, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/exercises/{id}/alias",
    params(
        ("id" = i64, Path, description = "Exercise id")
    ),
    request_body = SetAliasRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Alias saved", body = ExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Exercise belongs to someone else"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn set_alias(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
    Json(req): Json<SetAliasRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let exercise = services::set_alias(db.pool(), &ctx, id, &req.alias_name).await?;

    Ok(Json(exercise).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/resolve",
    params(ResolveExerciseParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Resolution result, matched or not", body = ResolveExerciseResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn resolve_exercise(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ResolveExerciseParams>,
) -> Result<Response, WebError> {
    let resolution = services::resolve_exercise(db.pool(), &ctx, &params.name).await?;

    Ok(Json(resolution).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/{id}/personal-records",
    params(
        ("id" = i64, Path, description = "Exercise id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "PR history, oldest first", body = Vec<PersonalRecord>),
        (status = 403, description = "Exercise belongs to someone else"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn list_personal_records(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let records = services::list_personal_records(db.pool(), &ctx, id).await?;

    Ok(Json(records).into_response())
}
