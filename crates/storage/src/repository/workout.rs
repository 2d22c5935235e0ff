use sqlx::PgConnection;

use crate::error::{Result, StorageError};
use crate::models::{Workout, WorkoutSetRow};

const WORKOUT_SET_ROWS: &str = r#"
    SELECT
        w.workout_id,
        w.name AS workout_name,
        w.created_at AS workout_created_at,
        w.updated_at AS workout_updated_at,
        s.set_id,
        s.reps,
        s.weight,
        m.movement_id,
        m.name AS movement_name,
        ml.movement_link_id,
        s.created_at AS set_created_at,
        s.updated_at AS set_updated_at
    FROM workouts w
    LEFT JOIN sets s ON s.workout_id = w.workout_id AND s.user_id = w.user_id
    LEFT JOIN movement_links ml ON ml.movement_link_id = s.movement_link_id
    LEFT JOIN movements m ON m.movement_id = ml.movement_id
"#;

pub struct WorkoutRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> WorkoutRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Create a new workout owned by the user
    pub async fn create(&mut self, user_id: i64, name: &str) -> Result<Workout> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (user_id, name)
            VALUES ($1, $2)
            RETURNING workout_id, user_id, name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(workout)
    }

    /// Get a workout by ID, only if the user owns it
    pub async fn find_for_user(&mut self, workout_id: i64, user_id: i64) -> Result<Workout> {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT workout_id, user_id, name, created_at, updated_at
            FROM workouts
            WHERE workout_id = $1 AND user_id = $2
            "#,
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Rename a workout and refresh its `updated_at`
    pub async fn rename(&mut self, workout_id: i64, user_id: i64, name: &str) -> Result<Workout> {
        sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
            SET name = $3, updated_at = now()
            WHERE workout_id = $1 AND user_id = $2
            RETURNING workout_id, user_id, name, created_at, updated_at
            "#,
        )
        .bind(workout_id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Delete a workout row. Its sets must already be gone.
    pub async fn delete(&mut self, workout_id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM workouts WHERE workout_id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// One joined row per set across all of the user's workouts, one bare row per empty workout
    pub async fn set_rows_for_user(&mut self, user_id: i64) -> Result<Vec<WorkoutSetRow>> {
        let sql = format!(
            "{WORKOUT_SET_ROWS} WHERE w.user_id = $1 ORDER BY w.created_at DESC, s.set_id"
        );

        let rows = sqlx::query_as::<_, WorkoutSetRow>(&sql)
            .bind(user_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows)
    }

    /// One joined row per set of a single workout, or one bare row if it has no sets
    pub async fn set_rows_for_workout(
        &mut self,
        user_id: i64,
        workout_id: i64,
    ) -> Result<Vec<WorkoutSetRow>> {
        let sql = format!(
            "{WORKOUT_SET_ROWS} WHERE w.user_id = $1 AND w.workout_id = $2 ORDER BY s.set_id"
        );

        let rows = sqlx::query_as::<_, WorkoutSetRow>(&sql)
            .bind(user_id)
            .bind(workout_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows)
    }
}
