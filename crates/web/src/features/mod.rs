use axum::Router;

use crate::auth::TokenKeys;
use crate::state::AppState;

pub mod movements;
pub mod users;
pub mod workouts;

pub fn routes(tokens: TokenKeys) -> Router<AppState> {
    Router::new()
        .merge(users::routes::routes(tokens.clone()))
        .nest("/workouts", workouts::routes::routes(tokens.clone()))
        .nest("/movements", movements::routes::routes(tokens))
}
