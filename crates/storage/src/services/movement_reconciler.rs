//! Resolves movement names from a workout submission to the user's movement links,
//! creating catalog movements and links on first use, and writes the submitted sets.
//!
//! All functions here are meant to run inside one unit of work so that a failure
//! anywhere leaves neither half-linked movements nor orphaned sets behind.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tracing::debug;

use crate::dto::workout::SetInput;
use crate::error::Result;
use crate::models::{Movement, MovementLink, NewSet, SetUpdate, WorkoutSet};

/// Lookups and inserts on the movement catalog and the per-user links.
#[async_trait]
pub trait MovementStore: Send {
    async fn find_movement_by_name(&mut self, name: &str) -> Result<Option<Movement>>;

    /// Insert keyed on the unique name; a concurrent duplicate resolves to the existing row.
    async fn upsert_movement(&mut self, name: &str) -> Result<Movement>;

    async fn find_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<Option<MovementLink>>;

    /// Insert keyed on `(movement_id, user_id)`; a concurrent duplicate resolves to the existing row.
    async fn insert_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<MovementLink>;
}

/// Writes on the sets table.
#[async_trait]
pub trait SetStore: Send {
    async fn insert_set(&mut self, set: &NewSet) -> Result<WorkoutSet>;

    /// Fails with `NotFound` when no set matched.
    async fn update_set(&mut self, set: &SetUpdate) -> Result<WorkoutSet>;
}

/// Request-scoped mapping from movement name to the user's movement link id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementLinkIds {
    links: HashMap<String, i64>,
}

impl MovementLinkIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.links.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.links.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Link id for `name`, reconciling it against the store on a cache miss.
    pub async fn resolve<S>(&mut self, store: &mut S, user_id: i64, name: &str) -> Result<i64>
    where
        S: MovementStore + ?Sized,
    {
        if let Some(id) = self.get(name) {
            return Ok(id);
        }

        let id = reconcile_movement(store, user_id, name).await?;
        self.links.insert(name.to_string(), id);
        Ok(id)
    }
}

/// Ensure every distinct name has a catalog movement and a link for the user.
///
/// Names are resolved in sorted order so concurrent requests take the row locks
/// on `movements` and `movement_links` in the same order.
pub async fn reconcile_movements<S, I>(store: &mut S, user_id: i64, names: I) -> Result<MovementLinkIds>
where
    S: MovementStore + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let names: BTreeSet<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    let mut link_ids = MovementLinkIds::new();

    for name in &names {
        link_ids.resolve(store, user_id, name).await?;
    }

    Ok(link_ids)
}

async fn reconcile_movement<S>(store: &mut S, user_id: i64, name: &str) -> Result<i64>
where
    S: MovementStore + ?Sized,
{
    let movement = match store.find_movement_by_name(name).await? {
        Some(movement) => movement,
        None => {
            let movement = store.upsert_movement(name).await?;
            debug!(movement_id = movement.movement_id, name, "Added movement to catalog");
            movement
        }
    };

    let link = match store.find_movement_link(movement.movement_id, user_id).await? {
        Some(link) => link,
        None => {
            let link = store.insert_movement_link(movement.movement_id, user_id).await?;
            debug!(
                movement_link_id = link.movement_link_id,
                movement_id = movement.movement_id,
                user_id,
                "Linked movement to user"
            );
            link
        }
    };

    Ok(link.movement_link_id)
}

/// Insert the sets of a newly created workout.
pub async fn attach_sets<S>(
    store: &mut S,
    sets: &[SetInput],
    link_ids: &mut MovementLinkIds,
    user_id: i64,
    workout_id: i64,
) -> Result<Vec<WorkoutSet>>
where
    S: MovementStore + SetStore + ?Sized,
{
    let mut attached = Vec::with_capacity(sets.len());

    for set in sets {
        let movement_link_id = link_ids.resolve(store, user_id, &set.movement_name).await?;

        let inserted = store
            .insert_set(&NewSet {
                reps: set.reps,
                weight: set.weight,
                user_id,
                movement_link_id,
                workout_id,
            })
            .await?;

        attached.push(inserted);
    }

    Ok(attached)
}

/// Apply edited sets: sets with an id are updated in place (their link is
/// re-resolved from the submitted movement name), sets without one are inserted.
pub async fn update_sets<S>(
    store: &mut S,
    sets: &[SetInput],
    user_id: i64,
    workout_id: i64,
    link_ids: &mut MovementLinkIds,
) -> Result<Vec<WorkoutSet>>
where
    S: MovementStore + SetStore + ?Sized,
{
    let mut written = Vec::with_capacity(sets.len());

    for set in sets {
        let movement_link_id = link_ids.resolve(store, user_id, &set.movement_name).await?;

        let row = match set.set_id {
            Some(set_id) => {
                store
                    .update_set(&SetUpdate {
                        set_id,
                        reps: set.reps,
                        weight: set.weight,
                        user_id,
                        movement_link_id,
                        workout_id,
                    })
                    .await?
            }
            None => {
                store
                    .insert_set(&NewSet {
                        reps: set.reps,
                        weight: set.weight,
                        user_id,
                        movement_link_id,
                        workout_id,
                    })
                    .await?
            }
        };

        written.push(row);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    /// In-memory store enforcing the same unique keys as the database.
    #[derive(Default)]
    struct FakeStore {
        movements: Vec<Movement>,
        links: Vec<MovementLink>,
        sets: Vec<WorkoutSet>,
        movement_lookups: usize,
        looked_up: Vec<String>,
        movement_upserts: usize,
        link_inserts: usize,
    }

    impl FakeStore {
        fn movement_id(&self, name: &str) -> Option<i64> {
            self.movements
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.movement_id)
        }

        fn link_for(&self, name: &str, user_id: i64) -> Option<i64> {
            let movement_id = self.movement_id(name)?;
            self.links
                .iter()
                .find(|l| l.movement_id == movement_id && l.user_id == user_id)
                .map(|l| l.movement_link_id)
        }
    }

    #[async_trait]
    impl MovementStore for FakeStore {
        async fn find_movement_by_name(&mut self, name: &str) -> Result<Option<Movement>> {
            self.movement_lookups += 1;
            self.looked_up.push(name.to_string());
            Ok(self.movements.iter().find(|m| m.name == name).cloned())
        }

        async fn upsert_movement(&mut self, name: &str) -> Result<Movement> {
            self.movement_upserts += 1;
            if let Some(existing) = self.movements.iter().find(|m| m.name == name) {
                return Ok(existing.clone());
            }
            let movement = Movement {
                movement_id: self.movements.len() as i64 + 1,
                name: name.to_string(),
            };
            self.movements.push(movement.clone());
            Ok(movement)
        }

        async fn find_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<Option<MovementLink>> {
            Ok(self
                .links
                .iter()
                .find(|l| l.movement_id == movement_id && l.user_id == user_id)
                .cloned())
        }

        async fn insert_movement_link(&mut self, movement_id: i64, user_id: i64) -> Result<MovementLink> {
            self.link_inserts += 1;
            if let Some(existing) = self
                .links
                .iter()
                .find(|l| l.movement_id == movement_id && l.user_id == user_id)
            {
                return Ok(existing.clone());
            }
            let link = MovementLink {
                movement_link_id: self.links.len() as i64 + 100,
                movement_id,
                user_id,
            };
            self.links.push(link.clone());
            Ok(link)
        }
    }

    #[async_trait]
    impl SetStore for FakeStore {
        async fn insert_set(&mut self, set: &NewSet) -> Result<WorkoutSet> {
            let row = WorkoutSet {
                set_id: self.sets.len() as i64 + 1,
                reps: set.reps,
                weight: set.weight,
                user_id: set.user_id,
                movement_link_id: set.movement_link_id,
                workout_id: set.workout_id,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            self.sets.push(row.clone());
            Ok(row)
        }

        async fn update_set(&mut self, set: &SetUpdate) -> Result<WorkoutSet> {
            let row = self
                .sets
                .iter_mut()
                .find(|s| {
                    s.set_id == set.set_id
                        && s.user_id == set.user_id
                        && s.workout_id == set.workout_id
                })
                .ok_or(StorageError::NotFound)?;
            row.reps = set.reps;
            row.weight = set.weight;
            row.movement_link_id = set.movement_link_id;
            Ok(row.clone())
        }
    }

    fn input(set_id: Option<i64>, movement_name: &str, reps: i32) -> SetInput {
        SetInput {
            set_id,
            reps,
            weight: Some(Decimal::new(60, 0)),
            movement_name: movement_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_names_are_reconciled_once() {
        let mut store = FakeStore::default();

        let link_ids = reconcile_movements(&mut store, 1, ["Squat", "Bench", "Squat"])
            .await
            .unwrap();

        assert_eq!(link_ids.len(), 2);
        assert_eq!(store.movement_lookups, 2);
        assert_eq!(store.movement_upserts, 2);
        assert_eq!(store.link_inserts, 2);
        assert_eq!(link_ids.get("Squat"), store.link_for("Squat", 1));
        assert_eq!(link_ids.get("Bench"), store.link_for("Bench", 1));
    }

    #[tokio::test]
    async fn test_names_are_resolved_in_sorted_order() {
        let mut store = FakeStore::default();

        reconcile_movements(&mut store, 1, ["Squat", "Bench", "Deadlift", "Bench"])
            .await
            .unwrap();
        reconcile_movements(&mut store, 2, ["Deadlift", "Squat", "Bench"])
            .await
            .unwrap();

        assert_eq!(
            store.looked_up,
            vec!["Bench", "Deadlift", "Squat", "Bench", "Deadlift", "Squat"]
        );
        let created: Vec<&str> = store.movements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(created, vec!["Bench", "Deadlift", "Squat"]);
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let mut store = FakeStore::default();

        let first = reconcile_movements(&mut store, 1, ["Squat"]).await.unwrap();
        let second = reconcile_movements(&mut store, 1, ["Squat"]).await.unwrap();

        assert_eq!(first.get("Squat"), second.get("Squat"));
        assert_eq!(store.movements.len(), 1);
        assert_eq!(store.links.len(), 1);
        assert_eq!(store.movement_upserts, 1);
        assert_eq!(store.link_inserts, 1);
    }

    #[tokio::test]
    async fn test_catalog_is_shared_but_links_are_per_user() {
        let mut store = FakeStore::default();

        let alice = reconcile_movements(&mut store, 1, ["Deadlift"]).await.unwrap();
        let bob = reconcile_movements(&mut store, 2, ["Deadlift"]).await.unwrap();

        assert_eq!(store.movements.len(), 1);
        assert_eq!(store.movement_upserts, 1);
        assert_eq!(store.links.len(), 2);
        assert_ne!(alice.get("Deadlift"), bob.get("Deadlift"));
    }

    #[tokio::test]
    async fn test_empty_submission_touches_nothing() {
        let mut store = FakeStore::default();

        let link_ids = reconcile_movements(&mut store, 1, Vec::<String>::new())
            .await
            .unwrap();

        assert!(link_ids.is_empty());
        assert_eq!(store.movement_lookups, 0);
    }

    #[tokio::test]
    async fn test_attach_sets_uses_resolved_links() {
        let mut store = FakeStore::default();
        let sets = vec![
            input(None, "Squat", 5),
            input(None, "Bench", 8),
            input(None, "Squat", 3),
        ];

        let mut link_ids = reconcile_movements(&mut store, 1, sets.iter().map(|s| &s.movement_name))
            .await
            .unwrap();
        let lookups_before = store.movement_lookups;

        let attached = attach_sets(&mut store, &sets, &mut link_ids, 1, 42).await.unwrap();

        assert_eq!(attached.len(), 3);
        assert_eq!(store.movement_lookups, lookups_before);
        assert!(attached.iter().all(|s| s.workout_id == 42 && s.user_id == 1));
        assert_eq!(Some(attached[0].movement_link_id), link_ids.get("Squat"));
        assert_eq!(Some(attached[1].movement_link_id), link_ids.get("Bench"));
        assert_eq!(attached[0].movement_link_id, attached[2].movement_link_id);
        assert_eq!(attached[2].reps, 3);
    }

    #[tokio::test]
    async fn test_changed_movement_is_resolved_before_update() {
        let mut store = FakeStore::default();
        let mut link_ids = reconcile_movements(&mut store, 1, ["Squat"]).await.unwrap();
        let created = attach_sets(&mut store, &[input(None, "Squat", 5)], &mut link_ids, 1, 9)
            .await
            .unwrap();
        let set_id = created[0].set_id;

        let edited = vec![input(Some(set_id), "Deadlift", 3)];
        let mut edit_links = reconcile_movements(&mut store, 1, edited.iter().map(|s| &s.movement_name))
            .await
            .unwrap();
        let updated = update_sets(&mut store, &edited, 1, 9, &mut edit_links).await.unwrap();

        let deadlift_link = store.link_for("Deadlift", 1).unwrap();
        assert_eq!(updated[0].set_id, set_id);
        assert_eq!(updated[0].movement_link_id, deadlift_link);
        assert_eq!(updated[0].reps, 3);
        assert_eq!(store.sets[0].movement_link_id, deadlift_link);
        assert_eq!(store.movements.len(), 2);
    }

    #[tokio::test]
    async fn test_update_resolves_names_missing_from_the_cache() {
        let mut store = FakeStore::default();
        let mut link_ids = MovementLinkIds::new();

        let written = update_sets(&mut store, &[input(None, "Dips", 10)], 1, 3, &mut link_ids)
            .await
            .unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(link_ids.get("Dips"), store.link_for("Dips", 1));
        assert_eq!(Some(written[0].movement_link_id), link_ids.get("Dips"));
    }

    #[tokio::test]
    async fn test_update_sets_inserts_new_and_updates_existing() {
        let mut store = FakeStore::default();
        let mut link_ids = MovementLinkIds::new();
        let created = attach_sets(&mut store, &[input(None, "Squat", 5)], &mut link_ids, 1, 9)
            .await
            .unwrap();

        let edited = vec![
            input(Some(created[0].set_id), "Squat", 6),
            input(None, "Squat", 4),
        ];
        let written = update_sets(&mut store, &edited, 1, 9, &mut link_ids).await.unwrap();

        assert_eq!(store.sets.len(), 2);
        assert_eq!(written[0].reps, 6);
        assert_eq!(written[1].reps, 4);
        assert_ne!(written[0].set_id, written[1].set_id);
    }

    #[tokio::test]
    async fn test_update_of_foreign_set_is_not_found() {
        let mut store = FakeStore::default();
        let mut link_ids = MovementLinkIds::new();
        let created = attach_sets(&mut store, &[input(None, "Squat", 5)], &mut link_ids, 1, 9)
            .await
            .unwrap();

        let result = update_sets(
            &mut store,
            &[input(Some(created[0].set_id), "Squat", 1)],
            2,
            9,
            &mut MovementLinkIds::new(),
        )
        .await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert_eq!(store.sets[0].reps, 5);
    }
}
