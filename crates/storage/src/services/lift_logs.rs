use sqlx::SqlitePool;
use tracing::{debug, info};

use super::one_rep_max::best_one_rep_max;
use super::personal_records::evaluate;
use crate::context::RequestContext;
use crate::dto::lift_log::CreateLiftLogRequest;
use crate::error::Result;
use crate::models::LiftLogWithSets;
use crate::repository::current_timestamp;
use crate::repository::exercise::ExerciseRepository;
use crate::repository::lift_log::LiftLogRepository;
use crate::repository::personal_record::{NewPersonalRecord, PersonalRecordRepository};
use crate::repository::workout::WorkoutRepository;

/// Writes a log and its sets and scores it against the caller's earlier
/// history for the exercise, all in one transaction.
///
/// Only logs at or before `logged_at` count as history. Later logs are never
/// demoted here; that is left to the historical recompute.
pub async fn create_lift_log(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateLiftLogRequest,
) -> Result<LiftLogWithSets> {
    let exercise = ExerciseRepository::new(pool)
        .find_visible(ctx, request.exercise_id)
        .await?;

    if let Some(workout_id) = request.workout_id {
        WorkoutRepository::new(pool).find_owned(ctx, workout_id).await?;
    }

    let logged_at = request.logged_at.unwrap_or_else(current_timestamp);
    let mut tx = pool.begin().await?;

    let earlier_sets = LiftLogRepository::sets_logged_up_to(
        &mut *tx,
        ctx.user_id,
        exercise.exercise_id,
        logged_at,
    )
    .await?;
    let previous_best = best_one_rep_max(&exercise, &earlier_sets);

    let log = LiftLogRepository::insert_log(&mut *tx, ctx.user_id, request, logged_at).await?;
    for (position, set) in (1..).zip(&request.sets) {
        LiftLogRepository::insert_set(&mut *tx, log.lift_log_id, position, set).await?;
    }

    let evaluation = evaluate(&exercise, &request.sets, previous_best);
    LiftLogRepository::update_pr_flags(
        &mut *tx,
        log.lift_log_id,
        evaluation.is_pr,
        evaluation.pr_count,
        current_timestamp(),
    )
    .await?;

    if let (true, Some(one_rep_max)) = (evaluation.is_pr, evaluation.best_one_rep_max) {
        PersonalRecordRepository::insert(
            &mut *tx,
            &NewPersonalRecord {
                user_id: ctx.user_id,
                exercise_id: exercise.exercise_id,
                lift_log_id: log.lift_log_id,
                one_rep_max,
                previous_one_rep_max: previous_best,
                achieved_at: logged_at,
            },
        )
        .await?;
        info!(
            "New PR for user {} on '{}': {:.2}",
            ctx.user_id, exercise.title, one_rep_max
        );
    }

    tx.commit().await?;

    debug!(
        "Created lift log {} with {} sets (pr_count {})",
        log.lift_log_id,
        request.sets.len(),
        evaluation.pr_count
    );

    LiftLogRepository::new(pool).find(log.lift_log_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::models::{BandType, PrStatus};
    use crate::test_support::{at, create_user, exercise_request, lift_request, setup_test_db};

    #[tokio::test]
    async fn test_pr_sequence_on_creation() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let squat = ExerciseRepository::new(db.pool())
            .create(&ctx, &exercise_request("Back Squat"))
            .await
            .unwrap();

        let mut statuses = Vec::new();
        for (day, weight) in [(1, 200.0), (2, 210.0), (3, 205.0)] {
            let created =
                create_lift_log(db.pool(), &ctx, &lift_request(squat.exercise_id, at(day), &[(weight, 5)]))
                    .await
                    .unwrap();
            statuses.push(created.log.pr_status());
        }

        assert_eq!(statuses, vec![PrStatus::Pr, PrStatus::Pr, PrStatus::NotPr]);

        let records = PersonalRecordRepository::new(db.pool())
            .list_for(&ctx, Some(squat.exercise_id))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].one_rep_max > records[0].one_rep_max);
    }

    #[tokio::test]
    async fn test_cannot_log_hidden_global_exercise() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let deadlift = ExerciseRepository::new(db.pool())
            .create_global(&exercise_request("Deadlift"))
            .await
            .unwrap();
        crate::repository::user::UserRepository::new(db.pool())
            .set_show_global_exercises(user.user_id, false)
            .await
            .unwrap();

        let result =
            create_lift_log(db.pool(), &ctx, &lift_request(deadlift.exercise_id, at(1), &[(150.0, 3)])).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_sets_are_kept_in_order() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let bench = ExerciseRepository::new(db.pool())
            .create(&ctx, &exercise_request("Bench Press"))
            .await
            .unwrap();

        let created = create_lift_log(
            db.pool(),
            &ctx,
            &lift_request(bench.exercise_id, at(1), &[(60.0, 10), (80.0, 5), (90.0, 2)]),
        )
        .await
        .unwrap();

        let weights: Vec<f64> = created.sets.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![60.0, 80.0, 90.0]);
        assert_eq!(created.sets[2].position, 3);
        assert_eq!(created.log.pr_count, 3);
    }

    #[tokio::test]
    async fn test_banded_exercise_is_evaluated_but_never_pr() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let mut request = exercise_request("Band Pull-apart");
        request.band_type = Some(BandType::Resistance);
        let band = ExerciseRepository::new(db.pool()).create(&ctx, &request).await.unwrap();

        let created = create_lift_log(db.pool(), &ctx, &lift_request(band.exercise_id, at(1), &[(0.0, 20)]))
            .await
            .unwrap();
        assert_eq!(created.log.pr_status(), PrStatus::NotPr);
    }

    #[tokio::test]
    async fn test_cannot_log_against_foreign_exercise_or_workout() {
        let db = setup_test_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let alice_ctx = RequestContext::new(alice.user_id);
        let bob_ctx = RequestContext::new(bob.user_id);

        let bobs = ExerciseRepository::new(db.pool())
            .create(&bob_ctx, &exercise_request("Bob Curl"))
            .await
            .unwrap();
        let result = create_lift_log(db.pool(), &alice_ctx, &lift_request(bobs.exercise_id, at(1), &[(20.0, 8)])).await;
        assert!(matches!(result, Err(StorageError::Forbidden)));

        let own = ExerciseRepository::new(db.pool())
            .create(&alice_ctx, &exercise_request("Curl"))
            .await
            .unwrap();
        let workout = WorkoutRepository::new(db.pool())
            .create(&bob_ctx, "Arms", None, None, None)
            .await
            .unwrap();
        let mut request = lift_request(own.exercise_id, at(1), &[(20.0, 8)]);
        request.workout_id = Some(workout.workout_id);
        let result = create_lift_log(db.pool(), &alice_ctx, &request).await;
        assert!(matches!(result, Err(StorageError::Forbidden)));
    }

    #[tokio::test]
    async fn test_deleted_logs_do_not_count_as_history() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let squat = ExerciseRepository::new(db.pool())
            .create(&ctx, &exercise_request("Front Squat"))
            .await
            .unwrap();

        let heavy = create_lift_log(db.pool(), &ctx, &lift_request(squat.exercise_id, at(1), &[(150.0, 3)]))
            .await
            .unwrap();
        LiftLogRepository::new(db.pool())
            .soft_delete(&ctx, heavy.log.lift_log_id)
            .await
            .unwrap();

        let lighter = create_lift_log(db.pool(), &ctx, &lift_request(squat.exercise_id, at(2), &[(100.0, 3)]))
            .await
            .unwrap();
        assert!(lighter.log.is_pr);
    }
}
