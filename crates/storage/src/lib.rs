pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
mod unit_of_work;

use sqlx::{PgPool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

use crate::error::Result;

pub use unit_of_work::UnitOfWork;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Shared handle on the Postgres connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Check out a single connection for read-only work
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }

    /// Start a unit of work; it rolls back unless committed
    pub async fn begin(&self) -> Result<UnitOfWork<'static>> {
        Ok(UnitOfWork::new(self.pool.begin().await?))
    }
}
