use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        set::CreateSetRequest,
        workout::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutResponse},
    },
    models::WorkoutSet,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/workouts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All workouts of the current user, most recent first", body = Vec<WorkoutResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn list_workouts(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let workouts = services::list_workouts(&db, user.user_id).await?;

    Ok(Json(workouts).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/{workout_id}",
    params(
        ("workout_id" = i64, Path, description = "Workout ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Workout found", body = WorkoutResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn get_workout(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
) -> Result<Response, WebError> {
    let workout = services::get_workout(&db, user.user_id, workout_id).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = CreateWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Workout created successfully", body = WorkoutResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn create_workout(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let workout = services::create_workout(&db, user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/workouts/{workout_id}",
    params(
        ("workout_id" = i64, Path, description = "Workout ID")
    ),
    request_body = UpdateWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Workout updated successfully", body = WorkoutResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout or set not found")
    ),
    tag = "workouts"
)]
pub async fn update_workout(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let workout = services::update_workout(&db, user.user_id, workout_id, &req).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{workout_id}",
    params(
        ("workout_id" = i64, Path, description = "Workout ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Workout deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn delete_workout(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_workout(&db, user.user_id, workout_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{workout_id}/movements/{movement_name}",
    params(
        ("workout_id" = i64, Path, description = "Workout ID"),
        ("movement_name" = String, Path, description = "Name of the movement whose sets are removed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Sets of the movement deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout, movement or sets not found")
    ),
    tag = "workouts"
)]
pub async fn delete_movement_from_workout(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, movement_name)): Path<(i64, String)>,
) -> Result<Response, WebError> {
    services::delete_movement_from_workout(&db, user.user_id, workout_id, &movement_name).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/{workout_id}/sets",
    params(
        ("workout_id" = i64, Path, description = "Workout ID")
    ),
    request_body = CreateSetRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Set added successfully", body = WorkoutSet),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout or movement link not found")
    ),
    tag = "workouts"
)]
pub async fn create_set(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<i64>,
    Json(req): Json<CreateSetRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let set = services::add_set(&db, user.user_id, workout_id, &req).await?;

    Ok((StatusCode::CREATED, Json(set)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{workout_id}/sets/{set_id}",
    params(
        ("workout_id" = i64, Path, description = "Workout ID"),
        ("set_id" = i64, Path, description = "Set ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Set deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Set not found")
    ),
    tag = "workouts"
)]
pub async fn delete_set(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, set_id)): Path<(i64, i64)>,
) -> Result<Response, WebError> {
    services::delete_set(&db, user.user_id, workout_id, set_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
