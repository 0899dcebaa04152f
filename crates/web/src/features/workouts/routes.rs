use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_workout, delete_workout, get_workout, list_workouts, parse_wod};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/parse", post(parse_wod))
        .route("/:id", get(get_workout).delete(delete_workout))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
