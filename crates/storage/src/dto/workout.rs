use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Workout;
use crate::services::exercise_resolver::{ExerciseResolver, Resolution};
use crate::wod::{ParsedWod, Scheme, WodItem, WodLineError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(max = 20000))]
    pub wod_syntax: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutResponse {
    pub workout_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub wod_syntax: Option<String>,
    pub wod: Option<ParsedWod>,
    pub created_at: NaiveDateTime,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            workout_id: workout.workout_id,
            name: workout.name,
            description: workout.description,
            wod_syntax: workout.wod_syntax,
            wod: workout.wod_parsed.map(|parsed| parsed.0),
            created_at: workout.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ParseWodRequest {
    #[validate(length(max = 20000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedWodBlock {
    pub name: Option<String>,
    pub line: Option<usize>,
    pub items: Vec<ResolvedWodItem>,
}

/// One WOD line with its scheme and catalog match attached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedWodItem {
    pub line: usize,
    /// `exercise` or `text`
    pub kind: String,
    pub text: Option<String>,
    pub name: Option<String>,
    pub scheme: Option<Scheme>,
    pub error: Option<String>,
    pub exercise_id: Option<i64>,
    pub display_name: Option<String>,
    pub can_log_now: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParseWodResponse {
    pub blocks: Vec<ResolvedWodBlock>,
    pub errors: Vec<WodLineError>,
}

impl ParseWodResponse {
    pub fn resolve(parsed: &ParsedWod, resolver: &ExerciseResolver) -> Self {
        let blocks = parsed
            .blocks
            .iter()
            .map(|block| ResolvedWodBlock {
                name: block.name.clone(),
                line: block.line,
                items: block
                    .items
                    .iter()
                    .map(|item| resolve_item(item, resolver))
                    .collect(),
            })
            .collect();

        Self {
            blocks,
            errors: parsed.errors(),
        }
    }
}

fn resolve_item(item: &WodItem, resolver: &ExerciseResolver) -> ResolvedWodItem {
    match item {
        WodItem::Exercise {
            line,
            name,
            scheme,
            error,
        } => {
            let (exercise_id, display_name) = match resolver.resolve(name) {
                Resolution::Matched(found) => (Some(found.exercise_id), Some(found.display_name)),
                Resolution::Unmatched => (None, None),
            };
            ResolvedWodItem {
                line: *line,
                kind: "exercise".to_string(),
                text: None,
                name: Some(name.clone()),
                scheme: scheme.clone(),
                error: error.clone(),
                can_log_now: exercise_id.is_some(),
                exercise_id,
                display_name,
            }
        }
        WodItem::Text { line, text } => ResolvedWodItem {
            line: *line,
            kind: "text".to_string(),
            text: Some(text.clone()),
            name: None,
            scheme: None,
            error: None,
            exercise_id: None,
            display_name: None,
            can_log_now: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::models::Exercise;
    use crate::services::one_rep_max::tests::exercise;
    use crate::wod::parse_wod;

    #[test]
    fn test_parse_response_marks_loggable_lines() {
        let ctx = RequestContext::new(1);
        let catalog = [Exercise {
            exercise_id: 3,
            user_id: None,
            title: "Push-ups".to_string(),
            ..exercise(None)
        }];
        let resolver = ExerciseResolver::new(&ctx, &catalog, &[]);

        let parsed = parse_wod("# Warmup\n[Push ups]: 3x10\n[Turkish Get-up]: x\nEasy pace");
        let response = ParseWodResponse::resolve(&parsed, &resolver);

        let items = &response.blocks[0].items;
        assert_eq!(response.blocks[0].name.as_deref(), Some("Warmup"));
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].exercise_id, Some(3));
        assert_eq!(items[0].display_name.as_deref(), Some("Push-ups"));
        assert!(items[0].can_log_now);

        assert_eq!(items[1].exercise_id, None);
        assert!(!items[1].can_log_now);
        assert!(items[1].error.is_some());

        assert_eq!(items[2].kind, "text");
        assert!(!items[2].can_log_now);

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].line, 3);
    }
}
