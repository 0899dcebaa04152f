use std::collections::HashMap;

use chrono::NaiveDateTime;
use storage::dto::import::ImportSummary;
use storage::models::{Ingredient, NormalizedExerciseName};
use storage::repository::food_log::{FoodLogRepository, NewFoodLog};
use tracing::{debug, warn};

use super::{TsvRow, parse_amount, parse_logged_at, rows, unresolved};
use crate::traits::{ImportContext, TsvImporter};
use crate::{ImporterError, Result};

/// `date, time, ingredient, quantity, unit, notes`. A blank unit falls back
/// to the ingredient's base unit.
pub struct FoodLogImporter;

#[derive(Debug)]
struct FoodLogRow<'a> {
    raw: &'a str,
    logged_at: NaiveDateTime,
    ingredient: &'a str,
    quantity: f64,
    unit: Option<&'a str>,
    notes: Option<&'a str>,
}

fn parse_row<'a>(row: &TsvRow<'a>) -> Option<FoodLogRow<'a>> {
    Some(FoodLogRow {
        raw: row.raw,
        logged_at: parse_logged_at(row.cell(0), row.cell(1))?,
        ingredient: row.optional(2)?,
        quantity: parse_amount(row.cell(3))?,
        unit: row.optional(4),
        notes: row.optional(5),
    })
}

#[async_trait::async_trait]
impl TsvImporter for FoodLogImporter {
    async fn import(&self, data: &str, context: &ImportContext) -> Result<ImportSummary> {
        let mut summary = ImportSummary::new("food logs");
        let mut parsed = Vec::new();

        for row in rows(data, "date")? {
            match parse_row(&row) {
                Some(parsed_row) => parsed.push(parsed_row),
                None => {
                    warn!("Invalid food log row: {}", row.raw);
                    summary.invalid_rows.push(row.raw.to_string());
                }
            }
        }

        let repo = FoodLogRepository::new(&context.pool);
        let ingredients: HashMap<NormalizedExerciseName, Ingredient> = repo
            .list_ingredients(&context.user)
            .await?
            .into_iter()
            .map(|i| (NormalizedExerciseName::new(&i.name), i))
            .collect();

        let missing = unresolved(parsed.iter().map(|row| row.ingredient), |name| {
            ingredients.contains_key(&NormalizedExerciseName::new(name))
        });
        if !missing.is_empty() {
            return Err(ImporterError::NotFound {
                entity: "ingredients",
                names: missing,
            });
        }

        for row in parsed {
            let Some(ingredient) = ingredients.get(&NormalizedExerciseName::new(row.ingredient)) else {
                continue;
            };

            if repo
                .exists(&context.user, ingredient.ingredient_id, row.logged_at, row.quantity)
                .await?
            {
                debug!("Skipping duplicate food log: {}", row.raw);
                summary.skipped += 1;
                continue;
            }

            repo.insert(
                &context.user,
                &NewFoodLog {
                    ingredient_id: ingredient.ingredient_id,
                    quantity: row.quantity,
                    unit: row.unit.unwrap_or(&ingredient.base_unit),
                    logged_at: row.logged_at,
                    notes: row.notes,
                },
            )
            .await?;
            summary.imported += 1;
        }

        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "food log"
    }
}
