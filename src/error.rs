//! Centralized error types for the simulation.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use std::io;

use glam::IVec2;

use crate::entity::ghost::Mode;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while building or running a level.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Board has no rows")]
    EmptyBoard,
    #[error("Row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Pen door must appear exactly once, found {0}")]
    InvalidHouseDoorCount(usize),
    #[error("Player start must appear exactly once, found {0}")]
    InvalidPlayerStartCount(usize),
    #[error("Start position for pursuer {0} not found")]
    MissingPursuerStart(u8),
    #[error("Invalid pen layout: {0}")]
    InvalidPen(String),
}

/// Errors related to grid queries.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("Cell {0} is outside the grid")]
    OutOfBounds(IVec2),
}

/// Errors related to entity updates.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {
    #[error("Invalid mode transition: {from} -> {to}")]
    InvalidModeTransition { from: Mode, to: Mode },

    #[error("No legal move from cell {0}")]
    NoLegalMove(IVec2),

    #[error("Unknown pursuer: {0}")]
    UnknownPursuer(usize),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Errors related to restoring persisted state.
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("Corrupt save state: {0}")]
    CorruptSaveState(String),

    #[error("Malformed save data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
