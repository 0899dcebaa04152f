use storage::dto::import::ImportSummary;
use storage::dto::workout::CreateWorkoutRequest;
use storage::repository::workout::WorkoutRepository;
use storage::services::workouts::create_workout;
use tracing::{debug, warn};
use validator::Validate;

use super::{TsvRow, rows};
use crate::Result;
use crate::traits::{ImportContext, TsvImporter};

/// `name, description, wod_syntax`. WOD lines are separated by a literal
/// `\n` inside the cell. Unknown exercise names in the WOD are kept as they
/// are, the same as when a workout is created through the API.
pub struct WorkoutImporter;

fn unescape_lines(cell: &str) -> String {
    cell.replace("\\n", "\n")
}

fn parse_row(row: &TsvRow<'_>) -> Option<CreateWorkoutRequest> {
    let request = CreateWorkoutRequest {
        name: row.optional(0)?.to_string(),
        description: row.optional(1).map(str::to_string),
        wod_syntax: row.optional(2).map(unescape_lines),
    };
    request.validate().ok()?;
    Some(request)
}

#[async_trait::async_trait]
impl TsvImporter for WorkoutImporter {
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new("workouts");

        // A workout with the same name and WOD text is a duplicate.
        let mut existing: Vec<(String, Option<String>)> = WorkoutRepository::new(&context.pool)
            .list(&context.user)
            .await?
            .into_iter()
            .map(|workout| (workout.name, workout.wod_syntax))
            .collect();

        for row in rows(data, "name")? {
            let Some(request) = parse_row(&row) else {
                warn!("Invalid workout row: {}", row.raw);
                summary.invalid_rows.push(row.raw.to_string());
                continue;
            };

            let key = (request.name.clone(), request.wod_syntax.clone());
            if existing.contains(&key) {
                debug!("Skipping duplicate workout: {}", request.name);
                summary.skipped += 1;
                continue;
            }

            create_workout(&context.pool, &context.user, &request).await?;
            existing.push(key);
            summary.imported += 1;
        }

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "workout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::RequestContext;
    use storage::test_support::{create_user, setup_test_db};

    async fn context() -> ImportContext {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id))
    }

    #[tokio::test]
    async fn test_workouts_are_parsed_and_deduplicated() {
        let context = context().await;
        let data = "Name\tDescription\tWOD\n\
                    Leg Day\tHeavy\t# Strength\\n[Back Squat]: 5x5\\n[Lunges]: 3x\n\
                    Recovery\t\t";

        let first = WorkoutImporter.import(data, &context).await.unwrap();
        assert_eq!(first.imported, 2);
        assert!(first.invalid_rows.is_empty());

        let again = WorkoutImporter.import(data, &context).await.unwrap();
        assert_eq!((again.imported, again.skipped), (0, 2));
        assert_eq!(again.message(), "No new data imported.");

        let workouts = WorkoutRepository::new(&context.pool).list(&context.user).await.unwrap();
        assert_eq!(workouts.len(), 2);

        let leg_day = workouts.iter().find(|w| w.name == "Leg Day").unwrap();
        assert_eq!(
            leg_day.wod_syntax.as_deref(),
            Some("# Strength\n[Back Squat]: 5x5\n[Lunges]: 3x")
        );
        let parsed = &leg_day.wod_parsed.as_ref().unwrap().0;
        assert_eq!(parsed.exercise_names(), vec!["Back Squat", "Lunges"]);
        assert_eq!(parsed.errors().len(), 1);
        assert_eq!(parsed.errors()[0].line, 3);

        let recovery = workouts.iter().find(|w| w.name == "Recovery").unwrap();
        assert!(recovery.wod_parsed.is_none());
    }

    #[tokio::test]
    async fn test_invalid_workout_rows() {
        let context = context().await;
        let long_name = "W".repeat(300);
        let data = format!("Push Day\t\t[Bench Press]: 3x8\n\tno name\t[Squat]: 5x5\n{long_name}\tlong");

        let summary = WorkoutImporter.import(&data, &context).await.unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.invalid_rows.len(), 2);
    }
}
