use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Entry of the movement catalog shared by all users, unique on `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movement {
    pub movement_id: i64,
    pub name: String,
}
