use sqlx::SqlitePool;
use tracing::debug;

use crate::context::RequestContext;
use crate::dto::workout::CreateWorkoutRequest;
use crate::error::Result;
use crate::models::Workout;
use crate::repository::workout::WorkoutRepository;
use crate::wod::parse_wod;

/// Stores a workout with its raw WOD text and the parsed form of that text.
/// Blank WOD text is stored as no WOD at all.
pub async fn create_workout(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &CreateWorkoutRequest,
) -> Result<Workout> {
    let wod_syntax = request
        .wod_syntax
        .as_deref()
        .filter(|text| !text.trim().is_empty());
    let parsed = wod_syntax.map(parse_wod);

    if let Some(parsed) = &parsed {
        debug!(
            "Workout '{}' parsed into {} blocks, {} line errors",
            request.name,
            parsed.blocks.len(),
            parsed.errors().len()
        );
    }

    WorkoutRepository::new(pool)
        .create(
            ctx,
            &request.name,
            request.description.as_deref(),
            wod_syntax,
            parsed.as_ref(),
        )
        .await
}
