#![allow(dead_code)]

use glam::IVec2;
use pursuit::config::Config;
use pursuit::constants::RAW_BOARD;
use pursuit::entity::ghost::{Mode, Pursuer};
use pursuit::entity::movement::Mover;
use pursuit::game::World;
use pursuit::map::direction::Direction;
use pursuit::map::grid::Grid;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A mostly open room with a walled pocket at (1, 1), a wall at (9, 10), a small pen in the
/// bottom-left corner and a single pellet beside the player start at (15, 5).
pub const OPEN_BOARD: [&str; 15] = [
    "#####################",
    "# #                 #",
    "#                   #",
    "#                   #",
    "#                   #",
    "#             .P    #",
    "#                   #",
    "#                   #",
    "#                   #",
    "#                   #",
    "#        #          #",
    "#                   #",
    "##=##################",
    "#0H123###############",
    "#####################",
];

pub fn default_grid() -> Grid {
    Grid::new(&RAW_BOARD).unwrap()
}

pub fn open_grid() -> Grid {
    Grid::new(&OPEN_BOARD).unwrap()
}

pub fn seeded_config() -> Config {
    Config {
        seed: Some(42),
        ..Config::default()
    }
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(7)
}

pub fn default_world() -> World {
    World::new(default_grid(), seeded_config()).unwrap()
}

/// A pursuer sitting at the center of `cell`, facing `direction`, about to make a decision there.
pub fn pursuer_at(grid: &Grid, id: usize, cell: IVec2, direction: Direction, mode: Mode) -> Pursuer {
    let countdown = if mode == Mode::Frightened { 300 } else { 0 };
    let mover = Mover::new(grid.to_position(cell), direction, 3.0);
    Pursuer::restore(id, mover, mode, cell, countdown).unwrap()
}

/// Ticks through the start countdown.
pub fn finish_countdown(world: &mut World) {
    for _ in 0..world.config().countdown_ticks() {
        world.tick().unwrap();
    }
}
