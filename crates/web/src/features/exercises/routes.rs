use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use storage::Database;

use super::handlers::{
    create_exercise, delete_exercise, list_exercises, list_personal_records, resolve_exercise,
    set_alias,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/resolve", get(resolve_exercise))
        .route("/:id", delete(delete_exercise))
        .route("/:id/alias", put(set_alias))
        .route("/:id/personal-records", get(list_personal_records))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
