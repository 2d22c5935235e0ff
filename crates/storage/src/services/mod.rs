pub mod movement_reconciler;
pub mod workout_tree;
