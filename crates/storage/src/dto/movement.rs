use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for linking a movement to the current user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LinkMovementRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Movement name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

/// A movement as linked by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MovementLinkResponse {
    pub movement_link_id: i64,
    pub movement_id: i64,
    pub name: String,
}
