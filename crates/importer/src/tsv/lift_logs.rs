use chrono::NaiveDateTime;
use storage::dto::import::ImportSummary;
use storage::dto::lift_log::{CreateLiftLogRequest, CreateLiftSetRequest};
use storage::repository::lift_log::LiftLogRepository;
use storage::services::exercise_resolver::ExerciseResolver;
use storage::services::lift_logs::create_lift_log;
use tracing::{debug, warn};
use validator::Validate;

use super::{TsvRow, parse_amount, parse_count, parse_logged_at, rows, unresolved};
use crate::traits::{ImportContext, TsvImporter};
use crate::{ImporterError, Result};

/// `date, time, exercise, weight, reps, rounds, comments, band_color`.
/// Each row becomes one log with `rounds` identical sets.
pub struct LiftLogImporter;

/// Upper bound on `rounds`; a row expands into this many sets at most.
pub const MAX_ROUNDS: usize = 100;

#[derive(Debug)]
struct LiftLogRow<'a> {
    raw: &'a str,
    logged_at: NaiveDateTime,
    exercise: &'a str,
    /// `exercise_id` is filled in once the name resolves.
    request: CreateLiftLogRequest,
}

/// Parses a row into the same request the API accepts and runs its
/// validation, so an import never stores what the API would reject.
fn parse_row<'a>(row: &TsvRow<'a>) -> Option<LiftLogRow<'a>> {
    let exercise = row.optional(2)?;
    let logged_at = parse_logged_at(row.cell(0), row.cell(1))?;
    let weight = match row.cell(3) {
        "" => 0.0,
        cell => parse_amount(cell)?,
    };
    let reps = parse_count(row.cell(4))?;
    let rounds = match row.cell(5) {
        "" => 1,
        cell => usize::try_from(parse_count(cell)?).ok()?,
    };
    if rounds > MAX_ROUNDS {
        return None;
    }

    let set = CreateLiftSetRequest {
        weight,
        reps,
        band_color: row.optional(7).map(str::to_string),
        notes: None,
    };
    let request = CreateLiftLogRequest {
        exercise_id: 0,
        logged_at: Some(logged_at),
        workout_id: None,
        comments: row.optional(6).map(str::to_string),
        sets: vec![set; rounds],
    };
    request.validate().ok()?;

    Some(LiftLogRow {
        raw: row.raw,
        logged_at,
        exercise,
        request,
    })
}

#[async_trait::async_trait]
impl TsvImporter for LiftLogImporter {
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new("lift logs");
        let mut parsed = Vec::new();

        for row in rows(data, "date")? {
            match parse_row(&row) {
                Some(parsed_row) => parsed.push(parsed_row),
                None => {
                    warn!("Invalid lift log row: {}", row.raw);
                    summary.invalid_rows.push(row.raw.to_string());
                }
            }
        }

        let resolver = ExerciseResolver::load(&context.pool, &context.user).await?;
        let missing = unresolved(parsed.iter().map(|row| row.exercise), |name| {
            resolver.resolve(name).is_matched()
        });
        if !missing.is_empty() {
            return Err(ImporterError::NotFound {
                entity: "exercises",
                names: missing,
            });
        }

        // Chronological order keeps creation-time PR flags consistent with history.
        parsed.sort_by_key(|row| row.logged_at);

        let logs = LiftLogRepository::new(&context.pool);
        for mut row in parsed {
            let Some(exercise_id) = resolver.resolve(row.exercise).exercise_id() else {
                continue;
            };
            if logs
                .exists_at(context.user.user_id, exercise_id, row.logged_at)
                .await?
            {
                debug!("Skipping duplicate lift log: {}", row.raw);
                summary.skipped += 1;
                continue;
            }

            row.request.exercise_id = exercise_id;
            create_lift_log(&context.pool, &context.user, &row.request).await?;
            summary.imported += 1;
        }

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "lift log"
    }
}
