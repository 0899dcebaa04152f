use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::PaginationMeta;
use crate::models::{LiftLogWithSets, PrStatus};
use crate::services::one_rep_max::{best_one_rep_max, round_for_display, set_one_rep_max};

/// Request payload for logging a lift with its sets
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLiftLogRequest {
    pub exercise_id: i64,

    /// Defaults to now
    pub logged_at: Option<NaiveDateTime>,

    pub workout_id: Option<i64>,

    #[validate(length(max = 2000))]
    pub comments: Option<String>,

    #[validate(length(min = 1, message = "At least one set is required"))]
    #[validate(nested)]
    pub sets: Vec<CreateLiftSetRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLiftSetRequest {
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    #[serde(default)]
    pub weight: f64,

    #[validate(range(min = 1, max = 1000, message = "Reps must be between 1 and 1000"))]
    pub reps: i32,

    #[validate(length(max = 50))]
    pub band_color: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiftSetResponse {
    pub lift_set_id: i64,
    pub position: i32,
    pub weight: f64,
    pub reps: i32,
    pub band_color: Option<String>,
    pub notes: Option<String>,
    /// Absent for banded sets and banded exercises
    pub one_rep_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiftLogResponse {
    pub lift_log_id: i64,
    pub exercise_id: i64,
    pub exercise_title: String,
    pub workout_id: Option<i64>,
    pub logged_at: NaiveDateTime,
    pub comments: Option<String>,
    pub is_pr: bool,
    pub pr_count: i32,
    pub pr_status: PrStatus,
    pub best_one_rep_max: Option<f64>,
    pub sets: Vec<LiftSetResponse>,
}

impl From<LiftLogWithSets> for LiftLogResponse {
    fn from(entry: LiftLogWithSets) -> Self {
        let LiftLogWithSets { log, exercise, sets } = entry;
        let best = best_one_rep_max(&exercise, &sets).map(round_for_display);
        let pr_status = log.pr_status();

        let sets = sets
            .into_iter()
            .map(|set| LiftSetResponse {
                one_rep_max: set_one_rep_max(&exercise, &set).map(round_for_display),
                lift_set_id: set.lift_set_id,
                position: set.position,
                weight: set.weight,
                reps: set.reps,
                band_color: set.band_color,
                notes: set.notes,
            })
            .collect();

        Self {
            lift_log_id: log.lift_log_id,
            exercise_id: log.exercise_id,
            exercise_title: exercise.title,
            workout_id: log.workout_id,
            logged_at: log.logged_at,
            comments: log.comments,
            is_pr: log.is_pr,
            pr_count: log.pr_count,
            pr_status,
            best_one_rep_max: best,
            sets,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LiftLogListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub exercise_id: Option<i64>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiftLogListResponse {
    pub data: Vec<LiftLogResponse>,
    pub pagination: PaginationMeta,
}
