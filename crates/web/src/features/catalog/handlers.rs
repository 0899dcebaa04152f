use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database, RequestContext,
    dto::catalog::{CreateIngredientRequest, CreateMeasurementTypeRequest},
    models::{BodyLog, FoodLog, Ingredient, MeasurementType},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/measurement-types",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's measurement types", body = Vec<MeasurementType>)
    ),
    tag = "catalog"
)]
pub async fn list_measurement_types(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let types = services::list_measurement_types(db.pool(), &ctx).await?;

    Ok(Json(types).into_response())
}

#[utoipa::path(
    post,
    path = "/api/measurement-types",
    request_body = CreateMeasurementTypeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Measurement type created", body = MeasurementType),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already used")
    ),
    tag = "catalog"
)]
pub async fn create_measurement_type(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateMeasurementTypeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let created = services::create_measurement_type(db.pool(), &ctx, &req).await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/body-logs",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's body logs, newest first", body = Vec<BodyLog>)
    ),
    tag = "catalog"
)]
pub async fn list_body_logs(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let logs = services::list_body_logs(db.pool(), &ctx).await?;

    Ok(Json(logs).into_response())
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's ingredients", body = Vec<Ingredient>)
    ),
    tag = "catalog"
)]
pub async fn list_ingredients(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let ingredients = services::list_ingredients(db.pool(), &ctx).await?;

    Ok(Json(ingredients).into_response())
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    request_body = CreateIngredientRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already used")
    ),
    tag = "catalog"
)]
pub async fn create_ingredient(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateIngredientRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let created = services::create_ingredient(db.pool(), &ctx, &req).await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/food-logs",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's food logs, newest first", body = Vec<FoodLog>)
    ),
    tag = "catalog"
)]
pub async fn list_food_logs(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, WebError> {
    let logs = services::list_food_logs(db.pool(), &ctx).await?;

    Ok(Json(logs).into_response())
}
