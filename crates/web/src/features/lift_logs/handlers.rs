use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database, RequestContext,
    dto::{
        common::PaginationParams,
        lift_log::{CreateLiftLogRequest, LiftLogListParams, LiftLogListResponse, LiftLogResponse},
    },
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/lift-logs",
    params(LiftLogListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's lift logs, newest first", body = LiftLogListResponse),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "lift-logs"
)]
pub async fn list_lift_logs(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<LiftLogListParams>,
) -> Result<Response, WebError> {
    let pagination = PaginationParams {
        page: params.page,
        page_size: params.page_size,
    };
    pagination.validate().map_err(WebError::BadRequest)?;

    let response = services::list_lift_logs(db.pool(), &ctx, &params, &pagination).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/lift-logs",
    request_body = CreateLiftLogRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Lift log created and PR-evaluated", body = LiftLogResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Exercise or workout belongs to someone else"),
        (status = 404, description = "Exercise or workout not found")
    ),
    tag = "lift-logs"
)]
pub async fn create_lift_log(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateLiftLogRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let log = services::create(db.pool(), &ctx, &req).await?;

    Ok((StatusCode::CREATED, Json(log)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/lift-logs/{id}",
    params(
        ("id" = i64, Path, description = "Lift log id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Lift log with sets", body = LiftLogResponse),
        (status = 403, description = "Lift log belongs to someone else"),
        (status = 404, description = "Lift log not found")
    ),
    tag = "lift-logs"
)]
pub async fn get_lift_log(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let log = services::get_lift_log(db.pool(), &ctx, id).await?;

    Ok(Json(log).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/lift-logs/{id}",
    params(
        ("id" = i64, Path, description = "Lift log id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Lift log deleted"),
        (status = 403, description = "Lift log belongs to someone else"),
        (status = 404, description = "Lift log not found")
    ),
    tag = "lift-logs"
)]
pub async fn delete_lift_log(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_lift_log(db.pool(), &ctx, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
