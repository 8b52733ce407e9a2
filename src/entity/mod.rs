//! Moving entities: the player, the pursuers, and the movement rules they share.

pub mod ghost;
pub mod movement;
pub mod player;
pub mod targeting;
