use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{create_lift_log, delete_lift_log, get_lift_log, list_lift_logs};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_lift_logs).post(create_lift_log))
        .route("/:id", get(get_lift_log).delete(delete_lift_log))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
