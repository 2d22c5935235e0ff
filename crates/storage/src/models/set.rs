use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutSet {
    pub set_id: i64,
    pub reps: i32,
    pub weight: Option<Decimal>,
    pub user_id: i64,
    pub movement_link_id: i64,
    pub workout_id: i64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Values for a set that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub reps: i32,
    pub weight: Option<Decimal>,
    pub user_id: i64,
    pub movement_link_id: i64,
    pub workout_id: i64,
}

/// New values for an existing set. The row is matched on set, user and workout.
#[derive(Debug, Clone, PartialEq)]
pub struct SetUpdate {
    pub set_id: i64,
    pub reps: i32,
    pub weight: Option<Decimal>,
    pub user_id: i64,
    pub movement_link_id: i64,
    pub workout_id: i64,
}
