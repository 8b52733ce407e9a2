//! Continuous movement across the grid, shared by the player and the pursuers.

use glam::{IVec2, Vec2};

use crate::constants::ENTITY_HALF_WIDTH;
use crate::entity::ghost::Mode;
use crate::map::direction::Direction;
use crate::map::grid::Grid;

/// Returns the speed multiplier applied to a pursuer in the given mode.
pub const fn speed_multiplier(mode: Mode) -> f32 {
    match mode {
        Mode::Frightened => 2.0 / 3.0,
        Mode::Returning => 4.0,
        Mode::Caged | Mode::Chasing => 1.0,
    }
}

/// How close, per axis, an entity must be to a point to count as having arrived there.
///
/// Always at least half a step, so an entity can never oscillate around its target.
pub fn arrival_tolerance(speed: f32, multiplier: f32) -> f32 {
    (speed * multiplier / 2.0).ceil()
}

/// The positional state of anything that moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    /// Center of the entity, in world units.
    pub position: Vec2,
    pub direction: Direction,
    /// Base distance covered per tick, before any mode multiplier.
    pub speed: f32,
}

impl Mover {
    pub fn new(position: Vec2, direction: Direction, speed: f32) -> Self {
        Self {
            position,
            direction,
            speed,
        }
    }

    /// The cell the entity's center is in.
    pub fn cell(&self, grid: &Grid) -> IVec2 {
        grid.to_cell(self.position)
    }

    /// Moves one tick along the current direction and returns the new position.
    ///
    /// Leaving the grid horizontally re-enters from the center of the opposite edge cell on the same row.
    pub fn advance(&mut self, grid: &Grid, multiplier: f32) -> Vec2 {
        let delta = self.direction.as_vec2() * self.speed * multiplier;
        let mut next = self.position + delta;

        let cell = grid.to_cell(next);
        if cell.x < 0 {
            next = grid.to_position(IVec2::new(grid.width() - 1, cell.y)) + delta;
        } else if cell.x >= grid.width() {
            next = grid.to_position(IVec2::new(0, cell.y)) + delta;
        }

        self.position = next;
        next
    }

    /// Returns `true` if moving one more tick in the current direction would put a leading corner of the
    /// entity's box inside a wall.
    ///
    /// Only the two leading corners are checked. A corner outside the grid means the entity is in the
    /// middle of wrapping through the tunnel, which never collides.
    pub fn will_collide(&self, grid: &Grid) -> bool {
        let mut top = self.position.y - ENTITY_HALF_WIDTH;
        let mut bottom = self.position.y + ENTITY_HALF_WIDTH;
        let mut left = self.position.x - ENTITY_HALF_WIDTH;
        let mut right = self.position.x + ENTITY_HALF_WIDTH;

        // Adjust for the movement next tick
        match self.direction {
            Direction::Up => top -= self.speed,
            Direction::Down => bottom += self.speed,
            Direction::Left => left -= self.speed,
            Direction::Right => right += self.speed,
        }

        let corners = match self.direction {
            Direction::Up => [Vec2::new(left, top), Vec2::new(right, top)],
            Direction::Down => [Vec2::new(left, bottom), Vec2::new(right, bottom)],
            Direction::Left => [Vec2::new(left, top), Vec2::new(left, bottom)],
            Direction::Right => [Vec2::new(right, top), Vec2::new(right, bottom)],
        };

        let cells = corners.map(|corner| grid.to_cell(corner));
        if cells.iter().any(|&cell| !grid.contains(cell)) {
            return false;
        }

        cells.iter().any(|&cell| grid.is_wall(cell).unwrap_or(false))
    }

    /// Returns `true` if the entity is within `tolerance` of the center of its current cell on both axes.
    pub fn is_centered(&self, grid: &Grid, tolerance: f32) -> bool {
        let offset = grid.to_position(self.cell(grid)) - self.position;
        offset.x.abs() <= tolerance && offset.y.abs() <= tolerance
    }
}
