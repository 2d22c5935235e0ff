use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{get_current_user, login, signup};
use crate::auth::TokenKeys;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(tokens: TokenKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(protected)
}
