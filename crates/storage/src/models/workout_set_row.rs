use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// One row of the workouts/sets/movement_links/movements join: a single set with
/// the fields of its workout and movement repeated on every row. A workout without
/// sets yields one row whose set and movement columns are all `NULL`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkoutSetRow {
    pub workout_id: i64,
    pub workout_name: String,
    pub workout_created_at: NaiveDateTime,
    pub workout_updated_at: NaiveDateTime,
    pub set_id: Option<i64>,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub movement_id: Option<i64>,
    pub movement_name: Option<String>,
    pub movement_link_id: Option<i64>,
    pub set_created_at: Option<NaiveDateTime>,
    pub set_updated_at: Option<NaiveDateTime>,
}
