use storage::{
    Database,
    dto::{
        set::CreateSetRequest,
        workout::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutResponse},
    },
    error::{Result, StorageError},
    models::{NewSet, WorkoutSet},
    repository::{set::SetRepository, workout::WorkoutRepository},
    services::{
        movement_reconciler::{attach_sets, reconcile_movements, update_sets},
        workout_tree::{transform, transform_one},
    },
};

/// List all workouts of a user, most recent first
pub async fn list_workouts(db: &Database, user_id: i64) -> Result<Vec<WorkoutResponse>> {
    let mut conn = db.acquire().await?;
    let rows = WorkoutRepository::new(&mut conn)
        .set_rows_for_user(user_id)
        .await?;

    Ok(transform(rows))
}

/// Get one workout of a user with its sets
pub async fn get_workout(db: &Database, user_id: i64, workout_id: i64) -> Result<WorkoutResponse> {
    let mut conn = db.acquire().await?;
    let rows = WorkoutRepository::new(&mut conn)
        .set_rows_for_workout(user_id, workout_id)
        .await?;

    transform_one(rows).ok_or(StorageError::NotFound)
}

/// Create a workout, link its movements and insert its sets in one transaction
pub async fn create_workout(
    db: &Database,
    user_id: i64,
    request: &CreateWorkoutRequest,
) -> Result<WorkoutResponse> {
    let mut uow = db.begin().await?;

    let workout = uow.workouts().create(user_id, &request.name).await?;

    let mut link_ids = reconcile_movements(&mut uow, user_id, request.movement_names()).await?;
    let sets = attach_sets(
        &mut uow,
        &request.sets,
        &mut link_ids,
        user_id,
        workout.workout_id,
    )
    .await?;

    let rows = uow
        .workouts()
        .set_rows_for_workout(user_id, workout.workout_id)
        .await?;

    uow.commit().await?;

    tracing::info!(
        workout_id = workout.workout_id,
        user_id,
        sets = sets.len(),
        movements = link_ids.len(),
        "Created workout"
    );

    transform_one(rows).ok_or(StorageError::NotFound)
}

/// Rename a workout and apply its edited sets in one transaction
pub async fn update_workout(
    db: &Database,
    user_id: i64,
    workout_id: i64,
    request: &UpdateWorkoutRequest,
) -> Result<WorkoutResponse> {
    let mut uow = db.begin().await?;

    uow.workouts().rename(workout_id, user_id, &request.name).await?;

    let mut link_ids = reconcile_movements(&mut uow, user_id, request.movement_names()).await?;
    let sets = update_sets(&mut uow, &request.sets, user_id, workout_id, &mut link_ids).await?;

    let rows = uow.workouts().set_rows_for_workout(user_id, workout_id).await?;

    uow.commit().await?;

    tracing::info!(workout_id, user_id, sets = sets.len(), "Updated workout");

    transform_one(rows).ok_or(StorageError::NotFound)
}

/// Delete a workout together with its sets
pub async fn delete_workout(db: &Database, user_id: i64, workout_id: i64) -> Result<()> {
    let mut uow = db.begin().await?;

    uow.workouts().find_for_user(workout_id, user_id).await?;
    let removed_sets = uow.sets().delete_for_workout(workout_id, user_id).await?;
    uow.workouts().delete(workout_id, user_id).await?;

    uow.commit().await?;

    tracing::info!(workout_id, user_id, removed_sets, "Deleted workout");

    Ok(())
}

/// Delete every set of one movement from a workout
pub async fn delete_movement_from_workout(
    db: &Database,
    user_id: i64,
    workout_id: i64,
    movement_name: &str,
) -> Result<u64> {
    let mut uow = db.begin().await?;

    uow.workouts().find_for_user(workout_id, user_id).await?;
    let link = uow
        .movements()
        .find_link_by_name(movement_name, user_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    let removed = uow
        .sets()
        .delete_for_movement(workout_id, user_id, link.movement_link_id)
        .await?;

    uow.commit().await?;

    Ok(removed)
}

/// Add a single set to a workout, using one of the user's movement links
pub async fn add_set(
    db: &Database,
    user_id: i64,
    workout_id: i64,
    request: &CreateSetRequest,
) -> Result<WorkoutSet> {
    let mut uow = db.begin().await?;

    uow.workouts().find_for_user(workout_id, user_id).await?;
    uow.movements()
        .find_linked(request.movement_link_id, user_id)
        .await?;

    let set = uow
        .sets()
        .insert(&NewSet {
            reps: request.reps,
            weight: request.weight,
            user_id,
            movement_link_id: request.movement_link_id,
            workout_id,
        })
        .await?;

    uow.commit().await?;

    Ok(set)
}

/// Delete one set of a workout
pub async fn delete_set(db: &Database, user_id: i64, workout_id: i64, set_id: i64) -> Result<()> {
    let mut conn = db.acquire().await?;
    SetRepository::new(&mut conn)
        .delete(set_id, workout_id, user_id)
        .await
}
