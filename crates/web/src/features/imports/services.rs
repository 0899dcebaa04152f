use sqlx::SqlitePool;
use storage::{RequestContext, dto::import::ImportSummary};

use importer::{ImportContext, ImportKind, Result, run_import};

pub async fn import(
    pool: &SqlitePool,
    ctx: &RequestContext,
    kind: ImportKind,
    data: &str,
) -> Result<ImportSummary> {
    let context = ImportContext::new(pool.clone(), *ctx);
    run_import(kind, data, &context).await
}
