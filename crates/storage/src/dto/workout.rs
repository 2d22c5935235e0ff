use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A workout with its sets, most recent set last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkoutResponse {
    pub workout_id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub sets: Vec<SetResponse>,
}

/// A set as it appears inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SetResponse {
    pub set_id: i64,
    pub reps: i32,
    pub weight: Option<Decimal>,
    pub movement_id: i64,
    pub movement_name: String,
    pub movement_link_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A set submitted with a workout. Sets without `set_id` are new.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetInput {
    #[serde(default)]
    pub set_id: Option<i64>,

    #[validate(range(min = 0, max = 100000, message = "Reps must be between 0 and 100000"))]
    pub reps: i32,

    #[serde(default)]
    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Movement name must be between 1 and 255 characters"
    ))]
    pub movement_name: String,
}

/// Request payload for creating a workout together with its sets
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, message = "A workout needs at least one set"), nested)]
    pub sets: Vec<SetInput>,
}

/// Request payload for editing a workout. Listed sets with an id are updated,
/// sets without one are added; sets that are not listed are left alone.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkoutRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub sets: Vec<SetInput>,
}

impl CreateWorkoutRequest {
    pub fn movement_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.movement_name.as_str())
    }
}

impl UpdateWorkoutRequest {
    pub fn movement_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.movement_name.as_str())
    }
}

/// Largest weight a `NUMERIC(8, 2)` column holds
const MAX_WEIGHT: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);
const WEIGHT_DECIMALS: u32 = 2;

pub(crate) fn validate_weight(weight: &Decimal) -> Result<(), ValidationError> {
    if weight.is_sign_negative() {
        let mut error = ValidationError::new("negative_weight");
        error.message = Some("Weight cannot be negative".into());
        return Err(error);
    }
    if *weight > MAX_WEIGHT {
        let mut error = ValidationError::new("weight_too_large");
        error.message = Some("Weight cannot exceed 999999.99".into());
        return Err(error);
    }
    // Trailing zeros do not count, 100.50 and 100.500 are the same weight
    if weight.normalize().scale() > WEIGHT_DECIMALS {
        let mut error = ValidationError::new("weight_precision");
        error.message = Some("Weight cannot have more than 2 decimal places".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(movement_name: &str, reps: i32) -> SetInput {
        SetInput {
            set_id: None,
            reps,
            weight: Some(Decimal::new(1000, 1)),
            movement_name: movement_name.to_string(),
        }
    }

    #[test]
    fn test_create_workout_requires_sets() {
        let req = CreateWorkoutRequest {
            name: "Leg day".to_string(),
            sets: vec![],
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sets"));
    }

    #[test]
    fn test_nested_set_validation() {
        let req = CreateWorkoutRequest {
            name: "Leg day".to_string(),
            sets: vec![set("Squat", 5), set("", 5)],
        };
        assert!(req.validate().is_err());

        let req = CreateWorkoutRequest {
            name: "Leg day".to_string(),
            sets: vec![set("Squat", -1)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut input = set("Squat", 5);
        input.weight = Some(Decimal::new(-5, 0));
        assert!(input.validate().is_err());

        input.weight = None;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_weight_must_fit_the_column() {
        let mut input = set("Squat", 5);

        input.weight = Some(Decimal::new(1_000_000, 0));
        assert!(input.validate().is_err());

        input.weight = Some(Decimal::new(99_999_999, 2));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_weight_keeps_at_most_two_decimals() {
        let mut input = set("Squat", 5);

        input.weight = Some(Decimal::new(100_125, 3));
        assert!(input.validate().is_err());

        input.weight = Some(Decimal::new(100_500, 3));
        assert!(input.validate().is_ok());

        input.weight = Some(Decimal::new(10_025, 2));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_workout_allows_rename_only() {
        let req: UpdateWorkoutRequest =
            serde_json::from_str(r#"{ "name": "Renamed" }"#).unwrap();
        assert!(req.sets.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_set_input_accepts_fetched_set_shape() {
        let json = r#"{
            "set_id": 7,
            "reps": 5,
            "weight": "100.5",
            "movement_id": 3,
            "movement_name": "Squat",
            "movement_link_id": 11,
            "created_at": "2024-01-01T10:00:00",
            "updated_at": "2024-01-01T10:00:00"
        }"#;
        let input: SetInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.set_id, Some(7));
        assert_eq!(input.weight, Some(Decimal::new(1005, 1)));
        assert_eq!(input.movement_name, "Squat");
    }

    #[test]
    fn test_movement_names_follow_set_order() {
        let req = CreateWorkoutRequest {
            name: "Push".to_string(),
            sets: vec![set("Bench", 5), set("Dips", 8), set("Bench", 5)],
        };
        let names: Vec<&str> = req.movement_names().collect();
        assert_eq!(names, vec!["Bench", "Dips", "Bench"]);
    }
}
