use sqlx::SqlitePool;
use storage::{
    RequestContext,
    dto::{
        common::{PaginationMeta, PaginationParams},
        lift_log::{CreateLiftLogRequest, LiftLogListParams, LiftLogListResponse, LiftLogResponse},
    },
    error::Result,
    repository::lift_log::LiftLogRepository,
    services::lift_logs::create_lift_log,
};

pub async fn list_lift_logs(
    pool: &SqlitePool,
    ctx: &RequestContext,
    params: &LiftLogListParams,
    pagination: &PaginationParams,
) -> Result<LiftLogListResponse> {
    let (logs, total) = LiftLogRepository::new(pool)
        .list_for_user(ctx, params.exercise_id, pagination)
        .await?;

    Ok(LiftLogListResponse {
        data: logs.into_iter().map(LiftLogResponse::from).collect(),
        pagination: PaginationMeta::new(pagination.page, pagination.page_size, total),
    })
}

pub async fn get_lift_log(pool: &SqlitePool, ctx: &RequestContext, lift_log_id: i64) -> Result<LiftLogResponse> {
    let entry = LiftLogRepository::new(pool).find_owned(ctx, lift_log_id).await?;
    Ok(LiftLogResponse::from(entry))
}

pub async fn create(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateLiftLogRequest,
) -> Result<LiftLogResponse> {
    let entry = create_lift_log(pool, ctx, request).await?;
    Ok(LiftLogResponse::from(entry))
}

pub async fn delete_lift_log(pool: &SqlitePool, ctx: &RequestContext, lift_log_id: i64) -> Result<()> {
    LiftLogRepository::new(pool).soft_delete(ctx, lift_log_id).await
}
