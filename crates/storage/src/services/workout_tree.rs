//! Rebuilds nested workouts from the flat rows of the sets join.
//!
//! Every row carries one set plus a copy of its workout and movement columns;
//! a workout without sets arrives as one row with empty set columns.
//! Rows are grouped by workout in first-seen order, workouts are ordered by
//! creation time (most recent first, ties keep first-seen order) and the sets
//! of each workout are ordered by set id.

use indexmap::IndexMap;

use crate::dto::workout::{SetResponse, WorkoutResponse};
use crate::models::WorkoutSetRow;

/// Turn joined set rows into workouts, most recent workout first.
pub fn transform(rows: Vec<WorkoutSetRow>) -> Vec<WorkoutResponse> {
    let mut grouped: IndexMap<i64, WorkoutResponse> = IndexMap::new();

    for row in rows {
        let WorkoutSetRow {
            workout_id,
            workout_name,
            workout_created_at,
            workout_updated_at,
            set_id,
            reps,
            weight,
            movement_id,
            movement_name,
            movement_link_id,
            set_created_at,
            set_updated_at,
        } = row;

        let workout = grouped
            .entry(workout_id)
            .or_insert_with(|| WorkoutResponse {
                workout_id,
                name: workout_name,
                created_at: workout_created_at,
                updated_at: workout_updated_at,
                sets: Vec::new(),
            });

        // Empty workouts come through as a single row without set columns
        if let (
            Some(set_id),
            Some(reps),
            Some(movement_id),
            Some(movement_name),
            Some(movement_link_id),
            Some(created_at),
            Some(updated_at),
        ) = (
            set_id,
            reps,
            movement_id,
            movement_name,
            movement_link_id,
            set_created_at,
            set_updated_at,
        ) {
            workout.sets.push(SetResponse {
                set_id,
                reps,
                weight,
                movement_id,
                movement_name,
                movement_link_id,
                created_at,
                updated_at,
            });
        }
    }

    let mut workouts: Vec<WorkoutResponse> = grouped.into_values().collect();

    // Stable sort keeps first-seen order for equal timestamps
    workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    for workout in &mut workouts {
        workout.sets.sort_by_key(|set| set.set_id);
    }

    workouts
}

/// Same as [`transform`] for the rows of a single workout. `None` when there are no rows.
pub fn transform_one(rows: Vec<WorkoutSetRow>) -> Option<WorkoutResponse> {
    transform(rows).into_iter().next()
}
