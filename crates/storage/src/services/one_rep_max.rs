//! Estimated one-rep-max (Epley).

use crate::dto::lift_log::CreateLiftSetRequest;
use crate::models::{Exercise, LiftSet};

/// Anything that carries the weight/reps/band of a performed set, persisted
/// or not yet written.
pub trait SetPerformance {
    fn weight(&self) -> f64;
    fn reps(&self) -> i32;
    fn band_color(&self) -> Option<&str>;

    fn is_banded(&self) -> bool {
        self.band_color().is_some_and(|c| !c.trim().is_empty())
    }
}

impl SetPerformance for LiftSet {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn reps(&self) -> i32 {
        self.reps
    }

    fn band_color(&self) -> Option<&str> {
        self.band_color.as_deref()
    }
}

impl SetPerformance for CreateLiftSetRequest {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn reps(&self) -> i32 {
        self.reps
    }

    fn band_color(&self) -> Option<&str> {
        self.band_color.as_deref()
    }
}

/// `weight * (1 + reps / 30)`. A single rep is the lift itself.
pub fn estimate_one_rep_max(weight: f64, reps: i32) -> Option<f64> {
    if reps <= 0 || !weight.is_finite() || weight <= 0.0 {
        return None;
    }
    if reps == 1 {
        return Some(weight);
    }
    Some(weight * (1.0 + f64::from(reps) / 30.0))
}

/// Banded exercises and banded sets never produce a value.
pub fn set_one_rep_max<S: SetPerformance>(exercise: &Exercise, set: &S) -> Option<f64> {
    if exercise.is_banded() || set.is_banded() {
        return None;
    }
    estimate_one_rep_max(set.weight(), set.reps())
}

pub fn best_one_rep_max<S: SetPerformance>(exercise: &Exercise, sets: &[S]) -> Option<f64> {
    sets.iter()
        .filter_map(|set| set_one_rep_max(exercise, set))
        .fold(None, |best, value| Some(best.map_or(value, |b: f64| b.max(value))))
}

/// Two decimals, for display only. Comparisons use the raw value.
pub fn round_for_display(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{BandType, ExerciseType};
    use chrono::NaiveDate;

    pub(crate) fn exercise(band_type: Option<BandType>) -> Exercise {
        Exercise {
            exercise_id: 1,
            user_id: Some(1),
            title: "Back Squat".to_string(),
            description: None,
            exercise_type: ExerciseType::Regular,
            is_bodyweight: false,
            band_type,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            deleted_at: None,
        }
    }

    pub(crate) fn set(weight: f64, reps: i32, band_color: Option<&str>) -> CreateLiftSetRequest {
        CreateLiftSetRequest {
            weight,
            reps,
            band_color: band_color.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn test_epley_estimate() {
        let value = estimate_one_rep_max(200.0, 5).unwrap();
        assert!((value - 233.333_333).abs() < 1e-5);
        assert_eq!(estimate_one_rep_max(100.0, 30), Some(200.0));
    }

    #[test]
    fn test_single_rep_is_the_lift() {
        assert_eq!(estimate_one_rep_max(315.0, 1), Some(315.0));
    }

    #[test]
    fn test_no_estimate_without_load_or_reps() {
        assert_eq!(estimate_one_rep_max(0.0, 10), None);
        assert_eq!(estimate_one_rep_max(100.0, 0), None);
        assert_eq!(estimate_one_rep_max(-5.0, 3), None);
    }

    #[test]
    fn test_banded_set_suppressed() {
        let squat = exercise(None);
        for (weight, reps) in [(0.0, 10), (100.0, 5), (500.0, 1)] {
            assert_eq!(set_one_rep_max(&squat, &set(weight, reps, Some("red"))), None);
        }
        assert!(set_one_rep_max(&squat, &set(100.0, 5, Some("  "))).is_some());
    }

    #[test]
    fn test_banded_exercise_suppressed() {
        let pull_up = exercise(Some(BandType::Assistance));
        assert_eq!(set_one_rep_max(&pull_up, &set(50.0, 5, None)), None);
        assert_eq!(best_one_rep_max(&pull_up, &[set(50.0, 5, None)]), None);
    }

    #[test]
    fn test_best_is_max_over_sets() {
        let squat = exercise(None);
        let sets = [set(100.0, 5, None), set(120.0, 1, None), set(90.0, 10, None)];
        let best = best_one_rep_max(&squat, &sets).unwrap();
        assert_eq!(round_for_display(best), 120.0);
        assert_eq!(best_one_rep_max::<CreateLiftSetRequest>(&squat, &[]), None);
    }
}
