use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ExerciseType {
    #[default]
    Regular,
    Bodyweight,
    WeightedResistance,
    Cardio,
}

/// Elastic band used with an exercise. Banded work has no meaningful
/// one-rep-max, so it is excluded from PR tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BandType {
    Resistance,
    Assistance,
}

impl std::str::FromStr for BandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resistance" => Ok(Self::Resistance),
            "assistance" => Ok(Self::Assistance),
            other => Err(format!("Unknown band type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: i64,
    /// `None` for exercises shared with every user
    pub user_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    pub is_bodyweight: bool,
    pub band_type: Option<BandType>,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Exercise {
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_banded(&self) -> bool {
        self.band_type.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Alias wins over the title when the viewer has one.
    pub fn display_name<'a>(&'a self, alias: Option<&'a str>) -> &'a str {
        alias.unwrap_or(&self.title)
    }
}

/// A band type always clears the bodyweight flag.
pub fn effective_bodyweight(is_bodyweight: bool, band_type: Option<BandType>) -> bool {
    is_bodyweight && band_type.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_type_clears_bodyweight() {
        assert!(!effective_bodyweight(true, Some(BandType::Assistance)));
        assert!(!effective_bodyweight(true, Some(BandType::Resistance)));
        assert!(effective_bodyweight(true, None));
        assert!(!effective_bodyweight(false, None));
    }

    #[test]
    fn test_band_type_parsing() {
        assert_eq!("Resistance".parse::<BandType>(), Ok(BandType::Resistance));
        assert_eq!(" assistance ".parse::<BandType>(), Ok(BandType::Assistance));
        assert!("rubber".parse::<BandType>().is_err());
    }
}
