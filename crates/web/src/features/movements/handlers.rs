use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::movement::{LinkMovementRequest, MovementLinkResponse},
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/movements",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Movements linked by the current user", body = Vec<MovementLinkResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "movements"
)]
pub async fn list_movements(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let movements = services::list_movements(&db, user.user_id).await?;

    Ok(Json(movements).into_response())
}

#[utoipa::path(
    post,
    path = "/api/movements",
    request_body = LinkMovementRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Movement linked to the current user", body = MovementLinkResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "movements"
)]
pub async fn link_movement(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LinkMovementRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let link = services::link_movement(&db, user.user_id, &req.name).await?;

    Ok((StatusCode::CREATED, Json(link)).into_response())
}
