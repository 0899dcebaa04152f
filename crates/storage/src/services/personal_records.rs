//! Personal-record evaluation, at log creation and as a full historical replay.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::one_rep_max::{SetPerformance, best_one_rep_max, set_one_rep_max};
use crate::error::Result;
use crate::models::{Exercise, LiftLogWithSets};
use crate::repository::current_timestamp;
use crate::repository::lift_log::LiftLogRepository;
use crate::repository::personal_record::{NewPersonalRecord, PersonalRecordRepository};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrEvaluation {
    pub is_pr: bool,
    /// Sets whose estimate strictly beats the previous best
    pub pr_count: i32,
    pub best_one_rep_max: Option<f64>,
}

/// Scores one log against the best estimate seen before it.
///
/// With no previous best, any set that produces an estimate is a PR.
pub fn evaluate<S: SetPerformance>(
    exercise: &Exercise,
    sets: &[S],
    previous_best: Option<f64>,
) -> PrEvaluation {
    let beats = |value: f64| previous_best.map_or(true, |best| value > best);

    let pr_count = sets
        .iter()
        .filter_map(|set| set_one_rep_max(exercise, set))
        .filter(|value| beats(*value))
        .count();

    let best = best_one_rep_max(exercise, sets);

    PrEvaluation {
        is_pr: best.is_some_and(beats),
        pr_count: i32::try_from(pr_count).unwrap_or(i32::MAX),
        best_one_rep_max: best,
    }
}

/// Running best for one (user, exercise) pair, fed logs in chronological order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrReplay {
    best: Option<f64>,
}

impl PrReplay {
    pub fn starting_from(best: Option<f64>) -> Self {
        Self { best }
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }

    pub fn record<S: SetPerformance>(&mut self, exercise: &Exercise, sets: &[S]) -> PrEvaluation {
        let evaluation = evaluate(exercise, sets, self.best);
        if evaluation.is_pr {
            self.best = evaluation.best_one_rep_max;
        }
        evaluation
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoricalPrOptions {
    pub user_id: Option<i64>,
    pub exercise_id: Option<i64>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalPrReport {
    pub pairs_processed: usize,
    pub logs_processed: usize,
    pub prs_found: usize,
    /// Logs whose stored flags differ from the replay, or that were never evaluated
    pub logs_changed: usize,
}

struct ReplayedLog {
    lift_log_id: i64,
    logged_at: NaiveDateTime,
    evaluation: PrEvaluation,
    previous_best: Option<f64>,
    changed: bool,
}

fn replay_pair(history: &[LiftLogWithSets]) -> Vec<ReplayedLog> {
    let mut replay = PrReplay::default();

    history
        .iter()
        .map(|entry| {
            let previous_best = replay.best();
            let evaluation = replay.record(&entry.exercise, &entry.sets);
            let log = &entry.log;
            ReplayedLog {
                lift_log_id: log.lift_log_id,
                logged_at: log.logged_at,
                changed: log.pr_evaluated_at.is_none()
                    || log.is_pr != evaluation.is_pr
                    || log.pr_count != evaluation.pr_count,
                evaluation,
                previous_best,
            }
        })
        .collect()
}

/// Replays every matching (user, exercise) history from scratch and rewrites
/// PR flags and PersonalRecord rows. Each pair commits on its own, so an
/// interrupted run leaves every pair either fully old or fully new.
pub async fn recalculate_historical(
    pool: &SqlitePool,
    options: &HistoricalPrOptions,
) -> Result<HistoricalPrReport> {
    let logs = LiftLogRepository::new(pool);
    let pairs = logs.history_pairs(options.user_id, options.exercise_id).await?;
    let mut report = HistoricalPrReport::default();

    for (user_id, exercise_id) in pairs {
        let history = logs.history(user_id, exercise_id).await?;
        let replayed = replay_pair(&history);

        report.pairs_processed += 1;
        report.logs_processed += replayed.len();
        report.prs_found += replayed.iter().filter(|r| r.evaluation.is_pr).count();
        report.logs_changed += replayed.iter().filter(|r| r.changed).count();

        debug!(
            "User {} exercise {}: {} logs, {} PRs",
            user_id,
            exercise_id,
            replayed.len(),
            replayed.iter().filter(|r| r.evaluation.is_pr).count()
        );

        if options.dry_run {
            continue;
        }

        let evaluated_at = current_timestamp();
        let mut tx = pool.begin().await?;

        PersonalRecordRepository::delete_for_pair(&mut *tx, user_id, exercise_id).await?;

        for entry in &replayed {
            LiftLogRepository::update_pr_flags(
                &mut *tx,
                entry.lift_log_id,
                entry.evaluation.is_pr,
                entry.evaluation.pr_count,
                evaluated_at,
            )
            .await?;

            if let (true, Some(one_rep_max)) =
                (entry.evaluation.is_pr, entry.evaluation.best_one_rep_max)
            {
                PersonalRecordRepository::insert(
                    &mut *tx,
                    &NewPersonalRecord {
                        user_id,
                        exercise_id,
                        lift_log_id: entry.lift_log_id,
                        one_rep_max,
                        previous_one_rep_max: entry.previous_best,
                        achieved_at: entry.logged_at,
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;
    }

    info!(
        "Historical PR recalculation{}: {} pairs, {} logs, {} PRs, {} changed",
        if options.dry_run { " (dry run)" } else { "" },
        report.pairs_processed,
        report.logs_processed,
        report.prs_found,
        report.logs_changed
    );

    Ok(report)
}
