use axum::{Router, middleware, routing::get};

use super::handlers::{link_movement, list_movements};
use crate::auth::TokenKeys;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(tokens: TokenKeys) -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(link_movement))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
}
