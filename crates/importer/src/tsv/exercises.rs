use std::collections::HashMap;

use storage::dto::exercise::CreateExerciseRequest;
use storage::dto::import::ImportSummary;
use storage::models::{BandType, Exercise, ExerciseType, NormalizedExerciseName, effective_bodyweight};
use storage::repository::exercise::ExerciseRepository;
use tracing::{debug, warn};
use validator::Validate;

use super::{TsvRow, parse_flag, rows};
use crate::Result;
use crate::traits::{ImportContext, TsvImporter};

/// `title, description, is_bodyweight, band_type`. Rows update the caller's
/// own exercise with the same normalized title, or create a new one.
pub struct ExerciseImporter;

#[derive(Debug)]
struct ExerciseRow {
    key: NormalizedExerciseName,
    request: CreateExerciseRequest,
}

/// Rows the API would reject, and titles with nothing left after
/// normalization, are invalid.
fn parse_row(row: &TsvRow<'_>) -> Option<ExerciseRow> {
    let title = row.optional(0)?;
    let key = NormalizedExerciseName::new(title);
    if key.is_empty() {
        return None;
    }

    let band_type = match row.optional(3) {
        Some(cell) => Some(cell.parse::<BandType>().ok()?),
        None => None,
    };

    let request = CreateExerciseRequest {
        title: title.to_string(),
        description: row.optional(1).map(str::to_string),
        exercise_type: ExerciseType::Regular,
        is_bodyweight: parse_flag(row.cell(2))?,
        band_type,
    };
    request.validate().ok()?;

    Some(ExerciseRow { key, request })
}

impl ExerciseRow {
    fn differs_from(&self, exercise: &Exercise) -> bool {
        let request = &self.request;
        exercise.description != request.description
            || exercise.is_bodyweight != effective_bodyweight(request.is_bodyweight, request.band_type)
            || exercise.band_type != request.band_type
    }
}

#[async_trait::async_trait]
impl TsvImporter for ExerciseImporter {
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new("exercises");
        let repo = ExerciseRepository::new(&context.pool);

        let mut own: HashMap<NormalizedExerciseName, Exercise> = repo
            .list_visible(&context.user, false)
            .await?
            .into_iter()
            .map(|exercise| (NormalizedExerciseName::new(&exercise.title), exercise))
            .collect();

        for row in rows(data, "title")? {
            let Some(parsed) = parse_row(&row) else {
                warn!("Invalid exercise row: {}", row.raw);
                summary.invalid_rows.push(row.raw.to_string());
                continue;
            };

            match own.get(&parsed.key) {
                Some(existing) if !parsed.differs_from(existing) => {
                    debug!("Exercise '{}' unchanged", parsed.request.title);
                    summary.skipped += 1;
                }
                Some(existing) => {
                    let updated = repo
                        .update_details(
                            &context.user,
                            existing.exercise_id,
                            parsed.request.description.as_deref(),
                            parsed.request.is_bodyweight,
                            parsed.request.band_type,
                        )
                        .await?;
                    own.insert(parsed.key, updated);
                    summary.updated += 1;
                }
                None => {
                    let created = repo.create(&context.user, &parsed.request).await?;
                    own.insert(parsed.key, created);
                    summary.imported += 1;
                }
            }
        }

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "exercise"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::RequestContext;
    use storage::test_support::{create_user, setup_test_db};

    #[tokio::test]
    async fn test_create_update_and_skip() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));

        let data = "Title\tDescription\tBodyweight\tBand\n\
                    Pull-ups\tStrict\tyes\n\
                    Band Face Pull\t\tno\tresistance";
        let first = ExerciseImporter.import(data, &context).await.unwrap();
        assert_eq!((first.imported, first.updated, first.skipped), (2, 0, 0));

        let again = ExerciseImporter.import(data, &context).await.unwrap();
        assert_eq!((again.imported, again.updated, again.skipped), (0, 0, 2));
        assert_eq!(again.message(), "No new data imported.");

        let changed = ExerciseImporter
            .import("pull ups\tKipping allowed\tyes", &context)
            .await
            .unwrap();
        assert_eq!(changed.updated, 1);

        let exercises = ExerciseRepository::new(db.pool())
            .list_visible(&context.user, false)
            .await
            .unwrap();
        assert_eq!(exercises.len(), 2);
        let pull_up = exercises.iter().find(|e| e.title == "Pull-ups").unwrap();
        assert_eq!(pull_up.description.as_deref(), Some("Kipping allowed"));
        assert!(pull_up.is_bodyweight);
    }

    #[tokio::test]
    async fn test_unusable_titles_are_invalid() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));
        let long_title = "Squat".repeat(60);
        let data = format!("---\t\tno\n!!!\t\tno\n{long_title}\t\tno\nGoblet Squat\t\tno");

        let summary = ExerciseImporter.import(&data, &context).await.unwrap();
        assert_eq!((summary.imported, summary.updated), (1, 0));
        assert_eq!(
            summary.invalid_rows,
            vec!["---\t\tno".to_string(), "!!!\t\tno".to_string(), format!("{long_title}\t\tno")]
        );

        let exercises = ExerciseRepository::new(db.pool())
            .list_visible(&context.user, false)
            .await
            .unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].title, "Goblet Squat");
    }

    #[tokio::test]
    async fn test_band_type_overrides_bodyweight_flag() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));

        let summary = ExerciseImporter
            .import("Assisted Dip\t\ttrue\tassistance\nMystery\t\tsometimes", &context)
            .await
            .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.invalid_rows, vec!["Mystery\t\tsometimes"]);

        let dip = &ExerciseRepository::new(db.pool())
            .list_visible(&context.user, false)
            .await
            .unwrap()[0];
        assert!(!dip.is_bodyweight);
        assert_eq!(dip.band_type, Some(BandType::Assistance));

        let again = ExerciseImporter
            .import("Assisted Dip\t\ttrue\tassistance", &context)
            .await
            .unwrap();
        assert_eq!(again.skipped, 1);
    }
}
