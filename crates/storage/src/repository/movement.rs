use sqlx::PgConnection;

use crate::dto::movement::MovementLinkResponse;
use crate::error::{Result, StorageError};
use crate::models::{Movement, MovementLink};

pub struct MovementRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> MovementRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Find a catalog movement by exact name
    pub async fn find_by_name(&mut self, name: &str) -> Result<Option<Movement>> {
        let movement = sqlx::query_as::<_, Movement>(
            "SELECT movement_id, name FROM movements WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(movement)
    }

    /// Insert a catalog movement, or return the existing row when the name is taken
    pub async fn upsert(&mut self, name: &str) -> Result<Movement> {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING movement_id, name
            "#,
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(movement)
    }

    /// Find the link between a movement and a user
    pub async fn find_link(&mut self, movement_id: i64, user_id: i64) -> Result<Option<MovementLink>> {
        let link = sqlx::query_as::<_, MovementLink>(
            r#"
            SELECT movement_link_id, movement_id, user_id
            FROM movement_links
            WHERE movement_id = $1 AND user_id = $2
            "#,
        )
        .bind(movement_id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(link)
    }

    /// Link a movement to a user, or return the existing link
    pub async fn insert_link(&mut self, movement_id: i64, user_id: i64) -> Result<MovementLink> {
        let link = sqlx::query_as::<_, MovementLink>(
            r#"
            INSERT INTO movement_links (movement_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (movement_id, user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING movement_link_id, movement_id, user_id
            "#,
        )
        .bind(movement_id)
        .bind(user_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::ConstraintViolation("Movement or user does not exist".to_string())
            } else {
                err
            }
        })?;

        Ok(link)
    }

    /// Find a user's link by movement name
    pub async fn find_link_by_name(&mut self, name: &str, user_id: i64) -> Result<Option<MovementLink>> {
        let link = sqlx::query_as::<_, MovementLink>(
            r#"
            SELECT ml.movement_link_id, ml.movement_id, ml.user_id
            FROM movement_links ml
            JOIN movements m ON m.movement_id = ml.movement_id
            WHERE m.name = $1 AND ml.user_id = $2
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(link)
    }

    /// Get a link with its movement name, only if it belongs to the user
    pub async fn find_linked(&mut self, movement_link_id: i64, user_id: i64) -> Result<MovementLinkResponse> {
        sqlx::query_as::<_, MovementLinkResponse>(
            r#"
            SELECT ml.movement_link_id, ml.movement_id, m.name
            FROM movement_links ml
            JOIN movements m ON m.movement_id = ml.movement_id
            WHERE ml.movement_link_id = $1 AND ml.user_id = $2
            "#,
        )
        .bind(movement_link_id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// List every movement linked by a user
    pub async fn list_for_user(&mut self, user_id: i64) -> Result<Vec<MovementLinkResponse>> {
        let links = sqlx::query_as::<_, MovementLinkResponse>(
            r#"
            SELECT ml.movement_link_id, ml.movement_id, m.name
            FROM movement_links ml
            JOIN movements m ON m.movement_id = ml.movement_id
            WHERE ml.user_id = $1
            ORDER BY m.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(links)
    }
}
