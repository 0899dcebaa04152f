//! Fixtures shared by this crate's tests and by dependent crates' tests
//! (enabled there through the `test-support` feature).

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqlitePoolOptions;

use crate::Database;
use crate::dto::exercise::CreateExerciseRequest;
use crate::dto::lift_log::{CreateLiftLogRequest, CreateLiftSetRequest};
use crate::models::{ExerciseType, User};
use crate::repository::user::UserRepository;

/// Fresh in-memory database with every migration applied.
///
/// A single connection keeps the whole pool on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("failed to enable foreign keys");

    let db = Database::from_pool(pool);
    db.run_migrations().await.expect("failed to run migrations");
    db
}

pub async fn create_user(db: &Database, name: &str) -> User {
    UserRepository::new(db.pool())
        .create(name, true)
        .await
        .expect("failed to create user")
}

pub fn exercise_request(title: &str) -> CreateExerciseRequest {
    CreateExerciseRequest {
        title: title.to_string(),
        description: None,
        exercise_type: ExerciseType::Regular,
        is_bodyweight: false,
        band_type: None,
    }
}

/// 08:00 on the given day of January 2025.
pub fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("valid fixture date")
}

/// A request with one set per `(weight, reps)` pair.
pub fn lift_request(exercise_id: i64, logged_at: NaiveDateTime, sets: &[(f64, i32)]) -> CreateLiftLogRequest {
    CreateLiftLogRequest {
        exercise_id,
        logged_at: Some(logged_at),
        workout_id: None,
        comments: None,
        sets: sets
            .iter()
            .map(|&(weight, reps)| CreateLiftSetRequest {
                weight,
                reps,
                band_color: None,
                notes: None,
            })
            .collect(),
    }
}
