use std::collections::HashMap;

use chrono::NaiveDateTime;
use storage::dto::import::ImportSummary;
use storage::models::{MeasurementType, NormalizedExerciseName};
use storage::repository::body_log::{BodyLogRepository, NewBodyLog};
use tracing::{debug, warn};

use super::{TsvRow, parse_amount, parse_logged_at, rows, unresolved};
use crate::traits::{ImportContext, TsvImporter};
use crate::{ImporterError, Result};

/// `date, time, measurement, value, unit, comments`. A blank unit falls back
/// to the measurement type's default.
pub struct BodyLogImporter;

#[derive(Debug)]
struct BodyLogRow<'a> {
    raw: &'a str,
    logged_at: NaiveDateTime,
    measurement: &'a str,
    value: f64,
    unit: Option<&'a str>,
    comments: Option<&'a str>,
}

fn parse_row<'a>(row: &TsvRow<'a>) -> Option<BodyLogRow<'a>> {
    Some(BodyLogRow {
        raw: row.raw,
        logged_at: parse_logged_at(row.cell(0), row.cell(1))?,
        measurement: row.optional(2)?,
        value: parse_amount(row.cell(3))?,
        unit: row.optional(4),
        comments: row.optional(5),
    })
}

#[async_trait::async_trait]
impl TsvImporter for BodyLogImporter {
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new("body logs");
        let mut parsed = Vec::new();

        for row in rows(data, "date")? {
            match parse_row(&row) {
                Some(parsed_row) => parsed.push(parsed_row),
                None => {
                    warn!("Invalid body log row: {}", row.raw);
                    summary.invalid_rows.push(row.raw.to_string());
                }
            }
        }

        let repo = BodyLogRepository::new(&context.pool);
        let types: HashMap<NormalizedExerciseName, MeasurementType> = repo
            .list_measurement_types(&context.user)
            .await?
            .into_iter()
            .map(|t| (NormalizedExerciseName::new(&t.name), t))
            .collect();

        let missing = unresolved(parsed.iter().map(|row| row.measurement), |name| {
            types.contains_key(&NormalizedExerciseName::new(name))
        });
        if !missing.is_empty() {
            return Err(ImporterError::NotFound {
                entity: "measurement types",
                names: missing,
            });
        }

        for row in parsed {
            let Some(measurement) = types.get(&NormalizedExerciseName::new(row.measurement)) else {
                continue;
            };

            if repo
                .exists_at(&context.user, measurement.measurement_type_id, row.logged_at)
                .await?
            {
                debug!("Skipping duplicate body log: {}", row.raw);
                summary.skipped += 1;
                continue;
            }

            repo.insert(
                &context.user,
                &NewBodyLog {
                    measurement_type_id: measurement.measurement_type_id,
                    value: row.value,
                    unit: row.unit.unwrap_or(&measurement.default_unit),
                    logged_at: row.logged_at,
                    comments: row.comments,
                },
            )
            .await?;
            summary.imported += 1;
        }

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "body log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::RequestContext;
    use storage::test_support::{create_user, setup_test_db};

    #[tokio::test]
    async fn test_import_and_reimport() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));
        let repo = BodyLogRepository::new(db.pool());
        repo.create_measurement_type(&context.user, "Body Weight", "kg")
            .await
            .unwrap();

        let data = "2025-01-05\t06:45\tbody weight\t81.4\t\tfasted\n2025-01-06\t06:50\tBody Weight\t81,1\tkg\t";
        let first = BodyLogImporter.import(data, &context).await.unwrap();
        assert_eq!(first.imported, 2);

        let second = BodyLogImporter.import(data, &context).await.unwrap();
        assert_eq!((second.imported, second.skipped), (0, 2));

        let logs = repo.list(&context.user).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|log| log.unit == "kg"));
    }

    #[tokio::test]
    async fn test_unknown_measurement() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));

        let error = BodyLogImporter
            .import("2025-01-05\t06:45\tWaist\t80\tcm\t", &context)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "No measurement types found for: Waist");
    }
}
