use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Exercise;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LiftLog {
    pub lift_log_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub workout_id: Option<i64>,
    pub logged_at: NaiveDateTime,
    pub comments: Option<String>,
    pub is_pr: bool,
    pub pr_count: i32,
    pub pr_evaluated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl LiftLog {
    pub fn pr_status(&self) -> PrStatus {
        match (self.pr_evaluated_at, self.is_pr) {
            (None, _) => PrStatus::Unknown,
            (Some(_), true) => PrStatus::Pr,
            (Some(_), false) => PrStatus::NotPr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LiftSet {
    pub lift_set_id: i64,
    pub lift_log_id: i64,
    pub position: i32,
    pub weight: f64,
    pub reps: i32,
    pub band_color: Option<String>,
    pub notes: Option<String>,
}

impl LiftSet {
    pub fn is_banded(&self) -> bool {
        self.band_color.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// PR state of a single log.
///
/// `Unknown` only exists between insert and evaluation; creation evaluates
/// once, and only the historical recompute may move `Pr` back to `NotPr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    Unknown,
    NotPr,
    Pr,
}

/// A lift log loaded together with its exercise and ordered sets.
#[derive(Debug, Clone, Serialize)]
pub struct LiftLogWithSets {
    pub log: LiftLog,
    pub exercise: Exercise,
    pub sets: Vec<LiftSet>,
}
