//! This module contains all the constants used by the simulation.

use glam::{IVec2, Vec2};

/// The default simulation rate, in ticks per second.
pub const TICKS_PER_SECOND: u32 = 30;

/// The size of each cell, in world units.
pub const CELL_SIZE: f32 = 32.0;

/// The size of the default board, in cells.
pub const BOARD_CELL_SIZE: IVec2 = IVec2::new(21, 27);

/// The offset of the board's top-left corner from the world origin.
///
/// The world is laid out as a 1600x900 canvas with the board centered on it.
pub const BOARD_ORIGIN: Vec2 = Vec2::new(
    1600.0 / 2.0 - (BOARD_CELL_SIZE.x as f32 * CELL_SIZE) / 2.0,
    900.0 / 2.0 - (BOARD_CELL_SIZE.y as f32 * CELL_SIZE) / 2.0,
);

/// Half the width of a moving entity's collision box, in world units.
pub const ENTITY_HALF_WIDTH: f32 = 5.0;

/// Base movement speed at level zero, in world units per tick.
pub const BASE_SPEED: f32 = 3.0;

/// Speed gained by every moving entity on each level increment.
pub const SPEED_PER_LEVEL: f32 = 0.5;

/// Ambush and Flank look this many cells ahead of the player.
pub const AMBUSH_LOOKAHEAD: i32 = 4;

/// Flank scales the reference-to-player vector by this factor.
pub const FLANK_SCALE: i32 = 2;

/// ProximityFlee gives up the chase when it gets this close to the player, in cells.
pub const FLEE_DISTANCE: f32 = 8.0;

/// The corner a fleeing pursuer runs towards. It lies just off the bottom-left of the default board.
pub const FLEE_CORNER: IVec2 = IVec2::new(0, 29);

/// The award for the first capture of a panic window; each further capture doubles it.
pub const CAPTURE_BASE_SCORE: u32 = 200;

/// `(pursuer, pellets eaten)` pairs: a caged pursuer is let out once that many pellets are gone.
/// Pursuer 0 is released by the start countdown instead.
pub const RELEASE_SCHEDULE: [(usize, usize); 3] = [(1, 1), (2, 30), (3, 63)];

/// Pellet counts at which a fruit appears. The second only spawns if the socket is empty.
pub const FRUIT_PELLET_COUNTS: [usize; 2] = [70, 170];

pub mod scoring {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 50;
}

/// Default map of the maze.
///
/// See [`crate::map::parser::MapTileParser`] for the meaning of each character.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "#####################",
    "#.........#.........#",
    "#o##.####.#.####.##o#",
    "#.##.####.#.####.##.#",
    "#...................#",
    "#.##.#.#######.#.##.#",
    "#....#....#....#....#",
    "####.####.#.####.####",
    "___#.#.........#.#___",
    "####.#.#######.#.####",
    "___#.#         #.#___",
    "___#.# ###=### #.#___",
    "####.# ##0H1## #.####",
    "    .  ##2H3##  .    ",
    "####.# ####### #.####",
    "___#.#....P....#.#___",
    "####.#.#######.#.####",
    "#.........#.........#",
    "#.##.###.###.###.##.#",
    "#o.#.............#.o#",
    "##.#.#.#######.#.#.##",
    "#....#....#....#....#",
    "#.#######.#.#######.#",
    "#.........#.........#",
    "#.#######.#.#######.#",
    "#...................#",
    "#####################",
];
