use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user's personal binding to a catalog movement, unique on `(movement_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MovementLink {
    pub movement_link_id: i64,
    pub movement_id: i64,
    pub user_id: i64,
}
