use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{
    create_set, create_workout, delete_movement_from_workout, delete_set, delete_workout,
    get_workout, list_workouts, update_workout,
};
use crate::auth::TokenKeys;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(tokens: TokenKeys) -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route(
            "/:workout_id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route(
            "/:workout_id/movements/:movement_name",
            delete(delete_movement_from_workout),
        )
        .route("/:workout_id/sets", post(create_set))
        .route("/:workout_id/sets/:set_id", delete(delete_set))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
}
