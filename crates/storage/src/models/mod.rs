mod movement;
mod movement_link;
mod set;
mod user;
mod workout;
mod workout_set_row;

pub use movement::Movement;
pub use movement_link::MovementLink;
pub use set::{NewSet, SetUpdate, WorkoutSet};
pub use user::User;
pub use workout::Workout;
pub use workout_set_row::WorkoutSetRow;
