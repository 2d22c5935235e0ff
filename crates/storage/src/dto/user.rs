use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Request payload for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Username must be between 3 and 255 characters"
    ))]
    pub username: String,

    #[validate(email(message = "Email must be a valid address"), length(max = 255))]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 1024,
        message = "Password must be at least 8 characters"
    ))]
    pub password: String,
}

/// Request payload for logging in with either a username or an email
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_login_identity"))]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// How a login request identifies its user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentity<'a> {
    Username(&'a str),
    Email(&'a str),
}

impl LoginRequest {
    /// Username wins when both are given.
    pub fn identity(&self) -> Option<LoginIdentity<'_>> {
        match (non_blank(&self.username), non_blank(&self.email)) {
            (Some(username), _) => Some(LoginIdentity::Username(username)),
            (None, Some(email)) => Some(LoginIdentity::Email(email)),
            (None, None) => None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_login_identity(req: &LoginRequest) -> Result<(), ValidationError> {
    if req.identity().is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("missing_identity");
        error.message = Some("Either username or email is required".into());
        Err(error)
    }
}

/// Public user profile, never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Response to a successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

impl From<crate::models::User> for UserResponse {
    fn from(user: crate::models::User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
