use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{
    create_ingredient, create_measurement_type, list_body_logs, list_food_logs, list_ingredients,
    list_measurement_types,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route(
            "/measurement-types",
            get(list_measurement_types).post(create_measurement_type),
        )
        .route("/body-logs", get(list_body_logs))
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/food-logs", get(list_food_logs))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
