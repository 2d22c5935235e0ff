use sqlx::PgConnection;

use crate::error::{Result, StorageError};
use crate::models::{NewSet, SetUpdate, WorkoutSet};

const SET_COLUMNS: &str =
    "set_id, reps, weight, user_id, movement_link_id, workout_id, created_at, updated_at";

pub struct SetRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> SetRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new set
    pub async fn insert(&mut self, set: &NewSet) -> Result<WorkoutSet> {
        let sql = format!(
            r#"
            INSERT INTO sets (reps, weight, user_id, movement_link_id, workout_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SET_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(set.reps)
            .bind(set.weight)
            .bind(set.user_id)
            .bind(set.movement_link_id)
            .bind(set.workout_id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                let err = StorageError::from(e);
                if err.is_foreign_key_violation() {
                    StorageError::ConstraintViolation(
                        "Set references a missing workout or movement".to_string(),
                    )
                } else {
                    err
                }
            })?;

        Ok(inserted)
    }

    /// Update reps, weight and movement link of an existing set
    pub async fn update(&mut self, set: &SetUpdate) -> Result<WorkoutSet> {
        let sql = format!(
            r#"
            UPDATE sets
            SET reps = $1,
                weight = $2,
                movement_link_id = $3,
                updated_at = now()
            WHERE set_id = $4 AND user_id = $5 AND workout_id = $6
            RETURNING {SET_COLUMNS}
            "#
        );

        sqlx::query_as::<_, WorkoutSet>(&sql)
            .bind(set.reps)
            .bind(set.weight)
            .bind(set.movement_link_id)
            .bind(set.set_id)
            .bind(set.user_id)
            .bind(set.workout_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Delete one set of a workout
    pub async fn delete(&mut self, set_id: i64, workout_id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM sets WHERE set_id = $1 AND workout_id = $2 AND user_id = $3",
        )
        .bind(set_id)
        .bind(workout_id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete every set of a workout, returning how many were removed
    pub async fn delete_for_workout(&mut self, workout_id: i64, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sets WHERE workout_id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every set of one movement within a workout
    pub async fn delete_for_movement(
        &mut self,
        workout_id: i64,
        user_id: i64,
        movement_link_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM sets
            WHERE workout_id = $1 AND user_id = $2 AND movement_link_id = $3
            "#,
        )
        .bind(workout_id)
        .bind(user_id)
        .bind(movement_link_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(result.rows_affected())
    }
}
