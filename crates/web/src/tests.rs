use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storage::{
    Database,
    repository::exercise::ExerciseRepository,
    test_support::{create_user, exercise_request, setup_test_db},
};
use tower::ServiceExt;

use crate::app;
use crate::middleware::auth::ApiKeys;

const ALICE: &str = "alice-key";
const BOB: &str = "bob-key";

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = setup_test_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let keys = ApiKeys::from_comma_separated(&format!(
            "{ALICE}:{},{BOB}:{}",
            alice.user_id, bob.user_id
        ));

        Self {
            router: app::router(db.clone(), keys),
            db,
        }
    }

    async fn send(&self, method: Method, uri: &str, key: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn create_exercise(&self, key: &str, body: Value) -> i64 {
        let (status, created) = self.send(Method::POST, "/api/exercises", Some(key), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        created["exercise_id"].as_i64().unwrap()
    }

    async fn log_lift(&self, key: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/lift-logs", Some(key), Some(body)).await
    }
}

#[tokio::test]
async fn test_missing_or_unknown_key_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/api/exercises", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(Method::GET, "/api/lift-logs", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_pr_flags_over_three_sessions() {
    let app = TestApp::new().await;
    let squat = app.create_exercise(ALICE, json!({ "title": "Back Squat" })).await;

    let mut flags = Vec::new();
    for (day, weight) in [(1, 200.0), (2, 210.0), (3, 205.0)] {
        let (status, log) = app
            .log_lift(
                ALICE,
                json!({
                    "exercise_id": squat,
                    "logged_at": format!("2025-01-0{day}T08:00:00"),
                    "sets": [{ "weight": weight, "reps": 5 }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        flags.push(log["is_pr"].as_bool().unwrap());
    }
    assert_eq!(flags, vec![true, true, false]);

    let (status, page) = app.send(Method::GET, "/api/lift-logs?page_size=2", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total_items"], 3);
    assert_eq!(page["pagination"]["total_pages"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"][0]["best_one_rep_max"], 239.17);

    let (status, records) = app
        .send(
            Method::GET,
            &format!("/api/exercises/{squat}/personal-records"),
            Some(ALICE),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_banded_set_has_no_one_rep_max() {
    let app = TestApp::new().await;
    let pull_up = app.create_exercise(ALICE, json!({ "title": "Pull-up" })).await;

    let (status, log) = app
        .log_lift(
            ALICE,
            json!({
                "exercise_id": pull_up,
                "sets": [
                    { "weight": 0, "reps": 8, "band_color": "red" },
                    { "weight": 10, "reps": 5 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(log["sets"][0]["one_rep_max"], Value::Null);
    assert_eq!(log["sets"][1]["one_rep_max"], 11.67);
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = TestApp::new().await;
    let squat = app.create_exercise(ALICE, json!({ "title": "Back Squat" })).await;

    let (status, body) = app
        .log_lift(ALICE, json!({ "exercise_id": squat, "sets": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0], "sets: At least one set is required");

    let (status, _) = app
        .send(Method::POST, "/api/exercises", Some(ALICE), Some(json!({ "title": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_resources_are_forbidden() {
    let app = TestApp::new().await;
    let squat = app.create_exercise(ALICE, json!({ "title": "Back Squat" })).await;
    let (_, log) = app
        .log_lift(ALICE, json!({ "exercise_id": squat, "sets": [{ "weight": 100, "reps": 5 }] }))
        .await;
    let log_id = log["lift_log_id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::GET, &format!("/api/lift-logs/{log_id}"), Some(BOB), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/exercises/{squat}"), Some(BOB), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .log_lift(BOB, json!({ "exercise_id": squat, "sets": [{ "weight": 100, "reps": 5 }] }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::GET, "/api/lift-logs/9999", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parse_resolves_exercise_lines() {
    let app = TestApp::new().await;
    ExerciseRepository::new(app.db.pool())
        .create_global(&exercise_request("Push-ups"))
        .await
        .unwrap();

    let (status, parsed) = app
        .send(
            Method::POST,
            "/api/workouts/parse",
            Some(ALICE),
            Some(json!({ "text": "# Circuit\n[Push ups]: 3x10\n[Sandbag Carry]: 4\n[Burpees]: 0x5" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let items = &parsed["blocks"][0]["items"];
    assert_eq!(parsed["blocks"][0]["name"], "Circuit");
    assert_eq!(items[0]["display_name"], "Push-ups");
    assert_eq!(items[0]["can_log_now"], true);
    assert_eq!(items[0]["scheme"]["type"], "sets_x_reps");
    assert_eq!(items[1]["can_log_now"], false);
    assert_eq!(items[1]["exercise_id"], Value::Null);
    assert_eq!(parsed["errors"][0]["line"], 4);
}

#[tokio::test]
async fn test_alias_changes_display_name() {
    let app = TestApp::new().await;
    let squat = app.create_exercise(ALICE, json!({ "title": "Back Squat" })).await;

    let (status, exercise) = app
        .send(
            Method::PUT,
            &format!("/api/exercises/{squat}/alias"),
            Some(ALICE),
            Some(json!({ "alias_name": "Squats" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exercise["display_name"], "Squats");

    let (_, resolved) = app
        .send(Method::GET, "/api/exercises/resolve?name=squats", Some(ALICE), None)
        .await;
    assert_eq!(resolved["matched"], true);
    assert_eq!(resolved["exercise_id"], squat);
    assert_eq!(resolved["via_alias"], true);
}

#[tokio::test]
async fn test_deleting_workout_unlinks_logs() {
    let app = TestApp::new().await;
    let squat = app.create_exercise(ALICE, json!({ "title": "Back Squat" })).await;

    let (status, workout) = app
        .send(
            Method::POST,
            "/api/workouts",
            Some(ALICE),
            Some(json!({ "name": "Leg day", "wod_syntax": "# Main\n[Back Squat]: 5x5" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(workout["wod"]["blocks"][0]["name"], "Main");
    let workout_id = workout["workout_id"].as_i64().unwrap();

    let (_, log) = app
        .log_lift(
            ALICE,
            json!({
                "exercise_id": squat,
                "workout_id": workout_id,
                "sets": [{ "weight": 100, "reps": 5 }]
            }),
        )
        .await;
    assert_eq!(log["workout_id"], workout_id);
    let log_id = log["lift_log_id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/workouts/{workout_id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, log) = app
        .send(Method::GET, &format!("/api/lift-logs/{log_id}"), Some(ALICE), None)
        .await;
    assert_eq!(log["workout_id"], Value::Null);

    let (status, _) = app
        .send(Method::GET, &format!("/api/workouts/{workout_id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tsv_import_round_trip() {
    let app = TestApp::new().await;
    app.create_exercise(ALICE, json!({ "title": "Deadlift" })).await;
    let rows = "2025-03-01\t09:00\tDeadlift\t180\t3\t2\t\n2025-03-04\t09:00\tdead-lift\t185\t3\t2\t";

    let (status, first) = app
        .send(Method::POST, "/api/import/lift-logs", Some(ALICE), Some(json!({ "data": rows })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["summary"]["imported"], 2);

    let (status, second) = app
        .send(Method::POST, "/api/import/lift-logs", Some(ALICE), Some(json!({ "data": rows })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["summary"]["imported"], 0);
    assert_eq!(second["message"], "No new data imported.");
}

#[tokio::test]
async fn test_import_errors() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/import/lift-logs",
            Some(ALICE),
            Some(json!({ "data": "2025-03-01\t09:00\tSled Push\t50\t1\t1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "No exercises found for: Sled Push");

    let (status, body) = app
        .send(Method::POST, "/api/import/food-logs", Some(ALICE), Some(json!({ "data": " \n " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "TSV data cannot be empty");

    let (status, _) = app
        .send(Method::POST, "/api/import/meals", Some(ALICE), Some(json!({ "data": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workout_import() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/import/workouts",
            Some(ALICE),
            Some(json!({ "data": "Leg Day\t\t# Strength\\n[Back Squat]: 5x5" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["imported"], 1);

    let (_, workouts) = app.send(Method::GET, "/api/workouts", Some(ALICE), None).await;
    assert_eq!(workouts[0]["name"], "Leg Day");
    assert_eq!(workouts[0]["wod"]["blocks"][0]["name"], "Strength");
}

#[tokio::test]
async fn test_catalog_and_body_log_import() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/measurement-types",
            Some(ALICE),
            Some(json!({ "name": "Waist", "default_unit": "cm" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/measurement-types",
            Some(ALICE),
            Some(json!({ "name": "Waist", "default_unit": "in" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/import/body-logs",
            Some(ALICE),
            Some(json!({ "data": "2025-03-01\t07:00\twaist\t84.5\t\t" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, logs) = app.send(Method::GET, "/api/body-logs", Some(ALICE), None).await;
    assert_eq!(logs[0]["unit"], "cm");
    assert_eq!(logs[0]["value"], 84.5);

    let (_, other) = app.send(Method::GET, "/api/body-logs", Some(BOB), None).await;
    assert_eq!(other.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, doc) = app.send(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/lift-logs"].is_object());
}
