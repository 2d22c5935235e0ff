use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{LoginRequest, LoginResponse, SignupRequest, UserResponse},
};
use validator::Validate;

use crate::auth::TokenKeys;
use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already exists")
    ),
    tag = "users"
)]
pub async fn signup(
    State(db): State<Database>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::signup(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Wrong password"),
        (status = 404, description = "No user with given username/email")
    ),
    tag = "users"
)]
pub async fn login(
    State(db): State<Database>,
    State(tokens): State<TokenKeys>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::login(&db, &tokens, &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Invalid or expired token")
    ),
    tag = "users"
)]
pub async fn get_current_user(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let profile = services::current_user(&db, user.user_id).await?;

    Ok(Json(profile).into_response())
}
