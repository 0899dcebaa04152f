//! Name to exercise matching for free-typed names (WOD lines, TSV rows).

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::ToSchema;

use crate::context::RequestContext;
use crate::error::Result;
use crate::models::{Exercise, ExerciseAlias, NormalizedExerciseName};
use crate::repository::exercise::ExerciseRepository;
use crate::repository::user::UserRepository;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExerciseMatch {
    pub exercise_id: i64,
    pub display_name: String,
    pub via_alias: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched(ExerciseMatch),
    Unmatched,
}

impl Resolution {
    pub fn exercise_id(&self) -> Option<i64> {
        match self {
            Resolution::Matched(m) => Some(m.exercise_id),
            Resolution::Unmatched => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }
}

// Declaration order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchSource {
    Alias,
    Own,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    source: MatchSource,
    exercise_id: i64,
}

/// Snapshot of the exercises one user can log against, keyed by normalized name.
#[derive(Debug, Clone)]
pub struct ExerciseResolver {
    by_name: HashMap<NormalizedExerciseName, Candidate>,
    display_names: HashMap<i64, String>,
}

impl ExerciseResolver {
    /// `exercises` must already be filtered to what the caller may see.
    /// Aliases pointing outside that set are ignored.
    pub fn new(ctx: &RequestContext, exercises: &[Exercise], aliases: &[ExerciseAlias]) -> Self {
        let mut by_name: HashMap<NormalizedExerciseName, Candidate> = HashMap::new();
        let mut display_names: HashMap<i64, String> = HashMap::new();

        let mut offer = |key: NormalizedExerciseName, candidate: Candidate| {
            if key.is_empty() {
                return;
            }
            by_name
                .entry(key)
                .and_modify(|current| {
                    if candidate < *current {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        };

        for exercise in exercises.iter().filter(|e| !e.is_deleted()) {
            let source = if ctx.owns(exercise.user_id) {
                MatchSource::Own
            } else if exercise.is_global() {
                MatchSource::Global
            } else {
                continue;
            };
            display_names.insert(exercise.exercise_id, exercise.title.clone());
            offer(
                NormalizedExerciseName::new(&exercise.title),
                Candidate {
                    source,
                    exercise_id: exercise.exercise_id,
                },
            );
        }

        for alias in aliases.iter().filter(|a| a.user_id == ctx.user_id) {
            let Some(name) = display_names.get_mut(&alias.exercise_id) else {
                continue;
            };
            *name = alias.alias_name.clone();
            offer(
                NormalizedExerciseName::new(&alias.alias_name),
                Candidate {
                    source: MatchSource::Alias,
                    exercise_id: alias.exercise_id,
                },
            );
        }

        Self {
            by_name,
            display_names,
        }
    }

    /// Loads the caller's catalog, honoring their `show_global_exercises` setting.
    pub async fn load(pool: &SqlitePool, ctx: &RequestContext) -> Result<Self> {
        let user = UserRepository::new(pool).find_by_id(ctx.user_id).await?;
        let repo = ExerciseRepository::new(pool);
        let exercises = repo.list_visible(ctx, user.show_global_exercises).await?;
        let aliases = repo.list_aliases(ctx).await?;

        debug!(
            "Loaded resolver for user {}: {} exercises, {} aliases",
            ctx.user_id,
            exercises.len(),
            aliases.len()
        );

        Ok(Self::new(ctx, &exercises, &aliases))
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        let key = NormalizedExerciseName::new(name);
        match self.by_name.get(&key) {
            Some(candidate) => Resolution::Matched(ExerciseMatch {
                exercise_id: candidate.exercise_id,
                display_name: self
                    .display_names
                    .get(&candidate.exercise_id)
                    .cloned()
                    .unwrap_or_else(|| name.to_string()),
                via_alias: candidate.source == MatchSource::Alias,
            }),
            None => Resolution::Unmatched,
        }
    }

    pub fn len(&self) -> usize {
        self.display_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::one_rep_max::tests::exercise;
    use crate::test_support::{create_user, exercise_request, setup_test_db};

    fn catalog_entry(id: i64, owner: Option<i64>, title: &str) -> Exercise {
        Exercise {
            exercise_id: id,
            user_id: owner,
            title: title.to_string(),
            ..exercise(None)
        }
    }

    fn alias(exercise_id: i64, name: &str) -> ExerciseAlias {
        ExerciseAlias {
            exercise_alias_id: exercise_id,
            user_id: 1,
            exercise_id,
            alias_name: name.to_string(),
            created_at: exercise(None).created_at,
        }
    }

    #[test]
    fn test_punctuation_and_spacing_are_ignored() {
        let ctx = RequestContext::new(1);
        let resolver = ExerciseResolver::new(&ctx, &[catalog_entry(7, None, "Push-ups")], &[]);

        let Resolution::Matched(found) = resolver.resolve("Push ups") else {
            panic!("expected a match");
        };
        assert_eq!(found.exercise_id, 7);
        assert_eq!(found.display_name, "Push-ups");
        assert!(!found.via_alias);

        assert_eq!(resolver.resolve("Pull ups"), Resolution::Unmatched);
    }

    #[test]
    fn test_alias_then_own_then_global_then_lowest_id() {
        let ctx = RequestContext::new(1);
        let exercises = [
            catalog_entry(1, None, "Row"),
            catalog_entry(2, Some(1), "row"),
            catalog_entry(3, None, "Squat"),
            catalog_entry(4, None, "squat!"),
            catalog_entry(5, Some(1), "Bent Row"),
        ];

        let resolver = ExerciseResolver::new(&ctx, &exercises, &[]);
        assert_eq!(resolver.resolve("ROW").exercise_id(), Some(2));
        assert_eq!(resolver.resolve("squat").exercise_id(), Some(3));

        let resolver = ExerciseResolver::new(&ctx, &exercises, &[alias(5, "Row")]);
        let Resolution::Matched(found) = resolver.resolve("row") else {
            panic!("expected a match");
        };
        assert_eq!(found.exercise_id, 5);
        assert_eq!(found.display_name, "Row");
        assert!(found.via_alias);
    }

    #[test]
    fn test_other_users_and_deleted_exercises_never_match() {
        let ctx = RequestContext::new(1);
        let mut deleted = catalog_entry(2, Some(1), "Dips");
        deleted.deleted_at = Some(deleted.created_at);
        let exercises = [catalog_entry(1, Some(2), "Lunge"), deleted];

        let resolver = ExerciseResolver::new(&ctx, &exercises, &[alias(2, "Ring Dips")]);
        assert!(!resolver.resolve("Lunge").is_matched());
        assert!(!resolver.resolve("Dips").is_matched());
        assert!(!resolver.resolve("Ring Dips").is_matched());
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_empty_name_is_unmatched() {
        let ctx = RequestContext::new(1);
        let resolver = ExerciseResolver::new(&ctx, &[catalog_entry(1, None, "Burpee")], &[]);
        assert_eq!(resolver.resolve(" -- "), Resolution::Unmatched);
    }

    #[tokio::test]
    async fn test_load_honors_global_preference() {
        let db = setup_test_db().await;
        let user = create_user(&db, "alice").await;
        let ctx = RequestContext::new(user.user_id);
        let repo = ExerciseRepository::new(db.pool());
        repo.create_global(&exercise_request("Push-ups")).await.unwrap();

        let resolver = ExerciseResolver::load(db.pool(), &ctx).await.unwrap();
        assert!(resolver.resolve("push ups").is_matched());

        UserRepository::new(db.pool())
            .set_show_global_exercises(user.user_id, false)
            .await
            .unwrap();
        let resolver = ExerciseResolver::load(db.pool(), &ctx).await.unwrap();
        assert!(!resolver.resolve("push ups").is_matched());
    }
}
