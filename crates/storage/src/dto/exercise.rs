use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{BandType, Exercise, ExerciseType};

/// Request payload for creating a user-owned exercise
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExerciseRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    pub exercise_type: ExerciseType,

    #[serde(default)]
    pub is_bodyweight: bool,

    pub band_type: Option<BandType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseResponse {
    pub exercise_id: i64,
    pub title: String,
    /// Alias if the caller has one, otherwise the title
    pub display_name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    pub is_bodyweight: bool,
    pub band_type: Option<BandType>,
    pub is_global: bool,
    pub created_at: NaiveDateTime,
}

impl ExerciseResponse {
    pub fn new(exercise: Exercise, alias: Option<&str>) -> Self {
        let display_name = exercise.display_name(alias).to_string();
        let is_global = exercise.is_global();
        Self {
            exercise_id: exercise.exercise_id,
            title: exercise.title,
            display_name,
            description: exercise.description,
            exercise_type: exercise.exercise_type,
            is_bodyweight: exercise.is_bodyweight,
            band_type: exercise.band_type,
            is_global,
            created_at: exercise.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetAliasRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Alias must be between 1 and 255 characters"
    ))]
    pub alias_name: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveExerciseParams {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolveExerciseResponse {
    pub query: String,
    pub matched: bool,
    pub exercise_id: Option<i64>,
    pub display_name: Option<String>,
    pub via_alias: bool,
}
