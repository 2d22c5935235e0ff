pub mod movement;
pub mod set;
pub mod user;
pub mod workout;
