use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use importer::ImportKind;
use storage::{
    Database, RequestContext,
    dto::import::{ImportRequest, ImportResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/import/{kind}",
    params(
        ("kind" = String, Path, description = "lift-logs, exercises, body-logs (or measurement-logs), food-logs or workouts")
    ),
    request_body = ImportRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Import summary, including rejected rows", body = ImportResponse),
        (status = 400, description = "Empty input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown import type"),
        (status = 422, description = "Names that match nothing in the caller's catalog")
    ),
    tag = "import"
)]
pub async fn import_tsv(
    State(db): State<Database>,
    Extension(ctx): Extension<RequestContext>,
    Path(kind): Path<String>,
    Json(req): Json<ImportRequest>,
) -> Result<Response, WebError> {
    let kind: ImportKind = kind.parse()?;
    req.validate()?;

    let summary = services::import(db.pool(), &ctx, kind, &req.data).await?;

    Ok(Json(ImportResponse::from(summary)).into_response())
}
