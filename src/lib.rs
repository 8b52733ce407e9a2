//! Headless simulation core for a maze-chase arcade game.
//!
//! The [`game::World`] owns a [`map::grid::Grid`], the player and four pursuers, and advances them
//! one fixed tick at a time. Rendering, audio and input devices live elsewhere; they drive the world
//! through [`events::GameCommand`]s and observe it through [`events::GameEvent`]s.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
