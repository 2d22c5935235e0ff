use sqlx::PgConnection;

use crate::error::{Result, StorageError};
use crate::models::User;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, created_at, updated_at";

pub struct UserRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Find user by ID
    pub async fn find_by_id(&mut self, user_id: i64) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Find user by username
    pub async fn find_by_username(&mut self, username: &str) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Find user by email
    pub async fn find_by_email(&mut self, email: &str) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Create a new user from an already hashed password
    pub async fn create(&mut self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                StorageError::from(e).on_unique_violation("Username or email already exists")
            })?;

        Ok(user)
    }
}
