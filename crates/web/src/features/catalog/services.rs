use sqlx::SqlitePool;
use storage::{
    RequestContext,
    dto::catalog::{CreateIngredientRequest, CreateMeasurementTypeRequest},
    error::Result,
    models::{BodyLog, FoodLog, Ingredient, MeasurementType},
    repository::{body_log::BodyLogRepository, food_log::FoodLogRepository},
};

pub async fn list_measurement_types(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<MeasurementType>> {
    BodyLogRepository::new(pool).list_measurement_types(ctx).await
}

pub async fn create_measurement_type(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateMeasurementTypeRequest,
) -> Result<MeasurementType> {
    BodyLogRepository::new(pool)
        .create_measurement_type(ctx, &request.name, &request.default_unit)
        .await
}

pub async fn list_body_logs(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<BodyLog>> {
    BodyLogRepository::new(pool).list(ctx).await
}

pub async fn list_ingredients(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<Ingredient>> {
    FoodLogRepository::new(pool).list_ingredients(ctx).await
}

pub async fn create_ingredient(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateIngredientRequest,
) -> Result<Ingredient> {
    FoodLogRepository::new(pool)
        .create_ingredient(ctx, &request.name, &request.base_unit)
        .await
}

pub async fn list_food_logs(pool: &SqlitePool, ctx: &RequestContext) -> Result<Vec<FoodLog>> {
    FoodLogRepository::new(pool).list(ctx).await
}
