use std::time::Duration;

use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{catalog, exercises, imports, lift_logs, workouts};
use crate::middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        exercises::handlers::list_exercises,
        exercises::handlers::create_exercise,
        exercises::handlers::delete_exercise,
        exercises::handlers::set_alias,
        exercises::handlers::resolve_exercise,
        exercises::handlers::list_personal_records,
        lift_logs::handlers::list_lift_logs,
        lift_logs::handlers::create_lift_log,
        lift_logs::handlers::get_lift_log,
        lift_logs::handlers::delete_lift_log,
        workouts::handlers::parse_wod,
        workouts::handlers::list_workouts,
        workouts::handlers::create_workout,
        workouts::handlers::get_workout,
        workouts::handlers::delete_workout,
        imports::handlers::import_tsv,
        catalog::handlers::list_measurement_types,
        catalog::handlers::create_measurement_type,
        catalog::handlers::list_body_logs,
        catalog::handlers::list_ingredients,
        catalog::handlers::create_ingredient,
        catalog::handlers::list_food_logs,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::exercise::CreateExerciseRequest,
            storage::dto::exercise::ExerciseResponse,
            storage::dto::exercise::SetAliasRequest,
            storage::dto::exercise::ResolveExerciseResponse,
            storage::dto::lift_log::CreateLiftLogRequest,
            storage::dto::lift_log::CreateLiftSetRequest,
            storage::dto::lift_log::LiftLogResponse,
            storage::dto::lift_log::LiftSetResponse,
            storage::dto::lift_log::LiftLogListResponse,
            storage::dto::workout::CreateWorkoutRequest,
            storage::dto::workout::WorkoutResponse,
            storage::dto::workout::ParseWodRequest,
            storage::dto::workout::ParseWodResponse,
            storage::dto::workout::ResolvedWodBlock,
            storage::dto::workout::ResolvedWodItem,
            storage::dto::import::ImportRequest,
            storage::dto::import::ImportSummary,
            storage::dto::import::ImportResponse,
            storage::dto::catalog::CreateMeasurementTypeRequest,
            storage::dto::catalog::CreateIngredientRequest,
            storage::models::ExerciseType,
            storage::models::BandType,
            storage::models::PrStatus,
            storage::models::PersonalRecord,
            storage::models::MeasurementType,
            storage::models::BodyLog,
            storage::models::Ingredient,
            storage::models::FoodLog,
            storage::wod::ParsedWod,
            storage::wod::WodBlock,
            storage::wod::WodItem,
            storage::wod::WodLineError,
            storage::wod::Scheme,
        )
    ),
    tags(
        (name = "exercises", description = "Exercise catalog, aliases and name resolution"),
        (name = "lift-logs", description = "Lift logs with one-rep-max and PR evaluation"),
        (name = "workouts", description = "Workouts and WOD notation parsing"),
        (name = "import", description = "Tab-separated bulk import"),
        (name = "catalog", description = "Measurements and food tracking"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

pub fn router(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let api = Router::new()
        .nest("/exercises", exercises::routes::routes(api_keys.clone()))
        .nest("/lift-logs", lift_logs::routes::routes(api_keys.clone()))
        .nest("/workouts", workouts::routes::routes(api_keys.clone()))
        .nest("/import", imports::routes::routes(api_keys.clone()))
        .merge(catalog::routes::routes(api_keys));

    Router::new()
        .nest("/api", api)
        .with_state(db)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
}
