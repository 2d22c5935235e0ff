use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::workout::validate_weight;

/// Request payload for adding a single set to an existing workout
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSetRequest {
    #[validate(range(min = 0, max = 100000, message = "Reps must be between 0 and 100000"))]
    pub reps: i32,

    #[serde(default)]
    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,

    pub movement_link_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weight: Decimal) -> CreateSetRequest {
        CreateSetRequest {
            reps: 5,
            weight: Some(weight),
            movement_link_id: 3,
        }
    }

    #[test]
    fn test_weight_outside_column_range_is_rejected() {
        assert!(request(Decimal::new(1_000_000, 0)).validate().is_err());
        assert!(request(Decimal::new(100_125, 3)).validate().is_err());
        assert!(request(Decimal::new(-1, 0)).validate().is_err());
        assert!(request(Decimal::new(14_250, 2)).validate().is_ok());
    }
}
