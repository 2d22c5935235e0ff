use storage::{
    Database,
    dto::user::{LoginIdentity, LoginRequest, LoginResponse, SignupRequest, UserResponse},
    error::{Result, StorageError},
    repository::user::UserRepository,
};

use crate::auth::{TokenKeys, password};
use crate::error::{WebError, WebResult};

/// Create a new account with a freshly hashed password
pub async fn signup(db: &Database, request: &SignupRequest) -> WebResult<UserResponse> {
    let plaintext = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| WebError::InternalServerError(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| WebError::InternalServerError(format!("Failed to hash password: {}", e)))?;

    let mut conn = db.acquire().await?;
    let user = UserRepository::new(&mut conn)
        .create(&request.username, &request.email, &password_hash)
        .await?;

    tracing::info!(user_id = user.user_id, "Created user {}", user.username);

    Ok(UserResponse::from(user))
}

/// Check credentials and issue an access token
pub async fn login(
    db: &Database,
    tokens: &TokenKeys,
    request: &LoginRequest,
) -> WebResult<LoginResponse> {
    let identity = request
        .identity()
        .ok_or_else(|| WebError::BadRequest("Either username or email is required".to_string()))?;

    let user = {
        let mut conn = db.acquire().await?;
        let mut users = UserRepository::new(&mut conn);
        let found = match identity {
            LoginIdentity::Username(username) => users.find_by_username(username).await,
            LoginIdentity::Email(email) => users.find_by_email(email).await,
        };

        found.map_err(|e| match e {
            StorageError::NotFound => {
                WebError::NotFound("No user with given username/email".to_string())
            }
            other => WebError::from(other),
        })?
    };

    let plaintext = request.password.clone();
    let stored_hash = user.password_hash.clone();
    let matches =
        tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &stored_hash))
            .await
            .map_err(|e| {
                WebError::InternalServerError(format!("Password verification task failed: {}", e))
            })?
            .map_err(|e| WebError::InternalServerError(format!("Stored password hash is invalid: {}", e)))?;

    if !matches {
        tracing::warn!(user_id = user.user_id, "Rejected login with wrong password");
        return Err(WebError::Forbidden("Passwords don't match".to_string()));
    }

    let access_token = tokens
        .issue(user.user_id, &user.username)
        .map_err(|e| WebError::InternalServerError(format!("Failed to issue token: {}", e)))?;

    tracing::info!(user_id = user.user_id, "User logged in");

    Ok(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        user: UserResponse::from(user),
    })
}

/// Get the profile of the authenticated user
pub async fn current_user(db: &Database, user_id: i64) -> Result<UserResponse> {
    let mut conn = db.acquire().await?;
    let user = UserRepository::new(&mut conn).find_by_id(user_id).await?;
    Ok(UserResponse::from(user))
}
