use sqlx::SqlitePool;
use storage::RequestContext;
use storage::dto::import::ImportSummary;

use crate::Result;

/// Everything an importer needs to write rows on behalf of one user.
pub struct ImportContext {
    pub pool: SqlitePool,
    pub user: RequestContext,
}

impl ImportContext {
    pub fn new(pool: SqlitePool, user: RequestContext) -> Self {
        Self { pool, user }
    }
}

#[async_trait::async_trait]
pub trait TsvImporter: Send + Sync {
    /// Imports every row of `data`. Rows that cannot be parsed are reported
    /// in the summary; names that resolve to nothing abort before any write.
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary>;

    fn name(&self) -> &'static str;
}
