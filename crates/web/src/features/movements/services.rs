use storage::{
    Database,
    dto::movement::MovementLinkResponse,
    error::Result,
    repository::movement::MovementRepository,
    services::movement_reconciler::MovementLinkIds,
};

/// List the movements linked by a user
pub async fn list_movements(db: &Database, user_id: i64) -> Result<Vec<MovementLinkResponse>> {
    let mut conn = db.acquire().await?;
    MovementRepository::new(&mut conn).list_for_user(user_id).await
}

/// Link a movement to a user, adding it to the catalog first if needed
pub async fn link_movement(db: &Database, user_id: i64, name: &str) -> Result<MovementLinkResponse> {
    let mut uow = db.begin().await?;

    let movement_link_id = MovementLinkIds::new().resolve(&mut uow, user_id, name).await?;
    let link = uow.movements().find_linked(movement_link_id, user_id).await?;

    uow.commit().await?;

    tracing::info!(movement_link_id, user_id, "Linked movement {}", link.name);

    Ok(link)
}
