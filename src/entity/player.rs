use glam::{IVec2, Vec2};
use tracing::debug;

use crate::entity::movement::Mover;
use crate::map::direction::Direction;
use crate::map::grid::Grid;

/// The player-controlled entity.
///
/// Steering is supplied from outside; the player keeps moving in its current direction until the
/// next tick would put it into a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    mover: Mover,
    lives: u32,
    alive: bool,
}

impl Player {
    /// Creates a player at the grid's start cell, facing right.
    pub fn new(grid: &Grid, speed: f32, lives: u32) -> Self {
        Self {
            mover: Mover::new(grid.to_position(grid.player_start()), Direction::Right, speed),
            lives,
            alive: true,
        }
    }

    /// Rebuilds a player from persisted fields.
    pub fn restore(position: Vec2, direction: Direction, speed: f32, lives: u32) -> Self {
        Self {
            mover: Mover::new(position, direction, speed),
            lives,
            alive: true,
        }
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn position(&self) -> Vec2 {
        self.mover.position
    }

    pub fn direction(&self) -> Direction {
        self.mover.direction
    }

    pub fn cell(&self, grid: &Grid) -> IVec2 {
        self.mover.cell(grid)
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn steer(&mut self, direction: Direction) {
        self.mover.direction = direction;
    }

    /// Moves one tick unless a wall is in the way. Returns `true` if the player moved.
    pub fn tick(&mut self, grid: &Grid) -> bool {
        if self.mover.will_collide(grid) {
            return false;
        }
        self.mover.advance(grid, 1.0);
        true
    }

    /// Takes a life. Has no effect if the player is already down.
    pub fn kill(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.lives = self.lives.saturating_sub(1);
        debug!(lives = self.lives, "Player caught");
    }

    pub fn gain_life(&mut self) {
        self.lives += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_BOARD;

    #[test]
    fn test_kill_only_once() {
        let grid = Grid::new(&RAW_BOARD).unwrap();
        let mut player = Player::new(&grid, 3.0, 3);

        player.kill();
        player.kill();
        assert_eq!(player.lives(), 2);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_tick_blocked_by_wall() {
        let grid = Grid::new(&RAW_BOARD).unwrap();
        let mut player = Player::new(&grid, 3.0, 3);

        // Directly above the start cell is a wall; the player may only close up to it
        let start = player.position();
        player.steer(Direction::Up);
        let moves = (0..10).filter(|_| player.tick(&grid)).count();
        assert_eq!(moves, 3);
        assert_eq!(player.position(), start - Vec2::new(0.0, 9.0));
        assert_eq!(player.cell(&grid), grid.player_start());

        player.steer(Direction::Left);
        assert!(player.tick(&grid));
        assert_eq!(player.position(), start - Vec2::new(3.0, 9.0));
    }
}
