use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::error::Result;
use crate::models::{Movement, MovementLink, NewSet, SetUpdate, WorkoutSet};
use crate::repository::{
    movement::MovementRepository, set::SetRepository, user::UserRepository,
    workout::WorkoutRepository,
};
use crate::services::movement_reconciler::{MovementStore, SetStore};

/// A database transaction with the repositories that run inside it.
///
/// Nothing is persisted until [`UnitOfWork::commit`]; dropping the unit of work
/// without committing rolls every statement back.
pub struct UnitOfWork<'c> {
    tx: Transaction<'c, Postgres>,
}

impl<'c> UnitOfWork<'c> {
    pub(crate) fn new(tx: Transaction<'c, Postgres>) -> Self {
        Self { tx }
    }

    pub fn users(&mut self) -> UserRepository<'_> {
        UserRepository::new(&mut self.tx)
    }

    pub fn movements(&mut self) -> MovementRepository<'_> {
        MovementRepository::new(&mut self.tx)
    }

    pub fn workouts(&mut self) -> WorkoutRepository<'_> {
        WorkoutRepository::new(&mut self.tx)
    }

    pub fn sets(&mut self) -> SetRepository<'_> {
        SetRepository::new(&mut self.tx)
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl MovementStore for UnitOfWork<'_> {
    async fn find_movement_by_name(&mut self, name: &str) -> Result<Option<Movement>> {
        self.movements().find_by_name(name).await
    }

    async fn upsert_movement(&mut self, name: &str) -> Result<Movement> {
        self.movements().upsert(name).await
    }

    async fn find_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<Option<MovementLink>> {
        self.movements().find_link(movement_id, user_id).await
    }

    async fn insert_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<MovementLink> {
        self.movements().insert_link(movement_id, user_id).await
    }
}

#[async_trait]
impl SetStore for UnitOfWork<'_> {
    async fn insert_set(&mut self, set: &NewSet) -> Result<WorkoutSet> {
        self.sets().insert(set).await
    }

    async fn update_set(&mut self, set: &SetUpdate) -> Result<WorkoutSet> {
        self.sets().update(set).await
    }
}
