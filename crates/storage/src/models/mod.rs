mod body_log;
mod exercise;
mod exercise_alias;
mod food_log;
mod lift_log;
mod normalized_name;
mod personal_record;
mod user;
mod workout;

pub use body_log::{BodyLog, MeasurementType};
pub use exercise::{BandType, Exercise, ExerciseType, effective_bodyweight};
pub use exercise_alias::ExerciseAlias;
pub use food_log::{FoodLog, Ingredient};
pub use lift_log::{LiftLog, LiftLogWithSets, LiftSet, PrStatus};
pub use normalized_name::NormalizedExerciseName;
pub use personal_record::PersonalRecord;
pub use user::User;
pub use workout::Workout;
