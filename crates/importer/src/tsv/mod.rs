//! Tab-separated imports, one fixed column layout per record type.
//!
//! | type       | columns                                                       |
//! |------------|---------------------------------------------------------------|
//! | lift-logs  | date, time, exercise, weight, reps, rounds, comments, band     |
//! | exercises  | title, description, is_bodyweight, band_type                   |
//! | body-logs  | date, time, measurement, value, unit, comments                 |
//! | food-logs  | date, time, ingredient, quantity, unit, notes                  |
//! | workouts   | name, description, wod_syntax (lines joined by a literal `\n`) |
//!
//! `measurement-logs` is accepted as another name for `body-logs`.
//! Trailing columns may be left out. A first row whose leading cell is the
//! first column's name is treated as a header and skipped.

mod body_logs;
mod exercises;
mod food_logs;
mod lift_logs;
mod workouts;

pub use body_logs::BodyLogImporter;
pub use exercises::ExerciseImporter;
pub use food_logs::FoodLogImporter;
pub use lift_logs::{LiftLogImporter, MAX_ROUNDS};
pub use workouts::WorkoutImporter;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use storage::dto::import::ImportSummary;
use storage::models::NormalizedExerciseName;
use tracing::info;

use crate::traits::{ImportContext, TsvImporter};
use crate::{ImporterError, Result};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%I:%M %p"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    LiftLogs,
    Exercises,
    BodyLogs,
    FoodLogs,
    Workouts,
}

impl ImportKind {
    pub fn importer(&self) -> Box<dyn TsvImporter> {
        match self {
            ImportKind::LiftLogs => Box::new(LiftLogImporter),
            ImportKind::Exercises => Box::new(ExerciseImporter),
            ImportKind::BodyLogs => Box::new(BodyLogImporter),
            ImportKind::FoodLogs => Box::new(FoodLogImporter),
            ImportKind::Workouts => Box::new(WorkoutImporter),
        }
    }
}

impl FromStr for ImportKind {
    type Err = ImporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lift-logs" => Ok(ImportKind::LiftLogs),
            "exercises" => Ok(ImportKind::Exercises),
            "body-logs" | "measurement-logs" => Ok(ImportKind::BodyLogs),
            "food-logs" => Ok(ImportKind::FoodLogs),
            "workouts" => Ok(ImportKind::Workouts),
            _ => Err(ImporterError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportKind::LiftLogs => "lift-logs",
            ImportKind::Exercises => "exercises",
            ImportKind::BodyLogs => "body-logs",
            ImportKind::FoodLogs => "food-logs",
            ImportKind::Workouts => "workouts",
        };
        f.write_str(name)
    }
}

pub async fn run_import(kind: ImportKind, data: &str, context: &ImportContext) -> Result<ImportSummary> {
    let importer = kind.importer();
    info!(
        "Running {} import for user {}",
        importer.name(),
        context.user.user_id
    );

    let summary = importer.import(data, context).await?;
    info!("{}", summary.message());

    Ok(summary)
}

/// One non-blank input line split on tabs, each cell trimmed.
#[derive(Debug, Clone)]
pub(crate) struct TsvRow<'a> {
    pub raw: &'a str,
    cells: Vec<&'a str>,
}

impl<'a> TsvRow<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            cells: raw.split('\t').map(str::trim).collect(),
        }
    }

    /// Missing trailing cells read as empty.
    pub fn cell(&self, index: usize) -> &'a str {
        self.cells.get(index).copied().unwrap_or("")
    }

    pub fn optional(&self, index: usize) -> Option<&'a str> {
        Some(self.cell(index)).filter(|cell| !cell.is_empty())
    }

    pub fn has_columns(&self, required: usize) -> bool {
        self.cells.len() >= required && self.cells[..required].iter().all(|c| !c.is_empty())
    }
}

/// Splits the input into rows, rejecting input with nothing in it.
pub(crate) fn rows<'a>(data: &'a str, header: &str) -> Result<Vec<TsvRow<'a>>> {
    let data = data.trim();
    if data.is_empty() {
        return Err(ImporterError::EmptyInput);
    }

    let mut rows: Vec<TsvRow<'a>> = data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(TsvRow::new)
        .collect();

    if rows
        .first()
        .is_some_and(|row| row.cell(0).eq_ignore_ascii_case(header))
    {
        rows.remove(0);
    }

    Ok(rows)
}

/// A blank time means midnight.
pub(crate) fn parse_logged_at(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())?;

    let time = if time.is_empty() {
        NaiveTime::MIN
    } else {
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(time, format).ok())?
    };

    Some(date.and_time(time))
}

/// Accepts a decimal comma. Negative and non-finite values are rejected.
pub(crate) fn parse_amount(cell: &str) -> Option<f64> {
    let value: f64 = cell.replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub(crate) fn parse_count(cell: &str) -> Option<i32> {
    cell.parse::<i32>().ok().filter(|n| *n > 0)
}

pub(crate) fn parse_flag(cell: &str) -> Option<bool> {
    match cell.to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" => Some(true),
        _ => None,
    }
}

/// Distinct names, in input order, that `found` rejects.
pub(crate) fn unresolved<'a>(
    names: impl IntoIterator<Item = &'a str>,
    mut found: impl FnMut(&str) -> bool,
) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    let mut seen: Vec<NormalizedExerciseName> = Vec::new();

    for name in names {
        let key = NormalizedExerciseName::new(name);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        if !found(name) {
            missing.push(name.to_string());
        }
    }

    missing
}
