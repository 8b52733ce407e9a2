//! Pursuer entity implementation.
//!
//! A pursuer is a [`Mover`] driven by a small state machine. It only makes a decision when it has
//! arrived at the center of the cell it was heading for; in between, it simply walks towards the
//! center of that target cell one axis at a time.

use glam::{IVec2, Vec2};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, Display, EnumIter, FromRepr};
use tracing::{debug, trace};

use crate::entity::movement::{arrival_tolerance, speed_multiplier, Mover};
use crate::entity::targeting::{next_step, Strategy, TargetContext};
use crate::error::EntityError;
use crate::map::direction::Direction;
use crate::map::grid::Grid;

/// The behavioural mode of a pursuer.
///
/// The discriminants are the values used in persisted state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Mode {
    /// Waiting inside the pen.
    #[default]
    Caged = 0,
    /// Hunting the player with its bound strategy.
    Chasing = 1,
    /// Vulnerable and wandering at random.
    Frightened = 2,
    /// Captured; heading back to the pen at high speed.
    Returning = 3,
}

impl Mode {
    /// Returns `true` if a pursuer may move from `self` to `to`.
    pub const fn can_transition(self, to: Mode) -> bool {
        matches!(
            (self, to),
            (Mode::Caged, Mode::Chasing)
                | (Mode::Caged | Mode::Chasing | Mode::Frightened, Mode::Frightened)
                | (Mode::Frightened, Mode::Chasing | Mode::Caged | Mode::Returning)
                | (Mode::Returning, Mode::Chasing)
        )
    }
}

/// What a pursuer can see of the rest of the world during its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PursuitView {
    pub player_cell: IVec2,
    pub player_direction: Direction,
    /// Cell of the pursuer bound to [`Strategy::Direct`], used by [`Strategy::Flank`].
    pub reference_cell: IVec2,
}

/// One of the four pursuers.
#[derive(Debug, Clone, PartialEq)]
pub struct Pursuer {
    id: usize,
    /// Fixed at creation and never reassigned.
    strategy: Strategy,
    mover: Mover,
    mode: Mode,
    /// The cell the pursuer is currently walking towards.
    target: IVec2,
    /// Whether the pursuer was within tolerance of its target's center at the start of its last move.
    at_center: bool,
    frighten_countdown: u32,
}

impl Pursuer {
    /// Creates a caged pursuer at its start cell. The pursuer's id determines its strategy.
    pub fn new(id: usize, grid: &Grid, speed: f32) -> Result<Self, EntityError> {
        let strategy = Strategy::from_repr(id as u8).ok_or(EntityError::UnknownPursuer(id))?;
        let start = grid.pursuer_start(id).ok_or(EntityError::UnknownPursuer(id))?;
        trace!(pursuer = id, strategy = strategy.as_ref(), cell = %start, "Pursuer created");

        Ok(Self {
            id,
            strategy,
            mover: Mover::new(grid.to_position(start), Direction::Right, speed),
            mode: Mode::Caged,
            target: start,
            at_center: true,
            frighten_countdown: 0,
        })
    }

    /// Rebuilds a pursuer from persisted fields.
    pub fn restore(
        id: usize,
        mover: Mover,
        mode: Mode,
        target: IVec2,
        frighten_countdown: u32,
    ) -> Result<Self, EntityError> {
        let strategy = Strategy::from_repr(id as u8).ok_or(EntityError::UnknownPursuer(id))?;

        Ok(Self {
            id,
            strategy,
            mover,
            mode,
            target,
            at_center: true,
            frighten_countdown,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn mode(&self) -> Mode {
        self.mode
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

    pub fn target(&self) -> IVec2 {
        self.target
    }

    pub fn is_at_center(&self) -> bool {
        self.at_center
    }

    pub fn frighten_countdown(&self) -> u32 {
        self.frighten_countdown
    }

    pub fn cell(&self, grid: &Grid) -> IVec2 {
        self.mover.cell(grid)
    }

    /// Moves to another mode, rejecting anything outside the transition table.
    pub fn transition(&mut self, to: Mode) -> Result<(), EntityError> {
        if !self.mode.can_transition(to) {
            return Err(EntityError::InvalidModeTransition { from: self.mode, to });
        }

        debug!(pursuer = self.id, from = %self.mode, to = %to, "Pursuer mode changed");
        self.mode = to;
        Ok(())
    }

    /// Lets a caged pursuer out, sending it to the pen exit.
    pub fn release(&mut self, grid: &Grid) -> Result<(), EntityError> {
        // Frightened and returning pursuers reach Chasing on their own, never by release
        if self.mode != Mode::Caged {
            return Err(EntityError::InvalidModeTransition {
                from: self.mode,
                to: Mode::Chasing,
            });
        }

        self.transition(Mode::Chasing)?;
        self.target = grid.pen_exit();
        Ok(())
    }

    /// Frightens the pursuer for `ticks` ticks. Returning pursuers are unaffected.
    ///
    /// Returns `true` if the pursuer is now frightened.
    pub fn frighten(&mut self, ticks: u32) -> Result<bool, EntityError> {
        if self.mode == Mode::Returning {
            return Ok(false);
        }

        if self.mode != Mode::Frightened {
            self.transition(Mode::Frightened)?;
        }
        self.frighten_countdown = ticks;
        Ok(true)
    }

    /// Marks a frightened pursuer as caught by the player.
    pub fn capture(&mut self) -> Result<(), EntityError> {
        self.transition(Mode::Returning)?;
        self.frighten_countdown = 0;
        Ok(())
    }

    /// Runs one tick of the pursuer.
    ///
    /// The update is all-or-nothing: if it fails, the pursuer is left exactly as it was.
    pub fn update<R: Rng + ?Sized>(&mut self, grid: &Grid, view: &PursuitView, rng: &mut R) -> Result<(), EntityError> {
        let mut next = self.clone();
        next.step(grid, view, rng)?;
        *self = next;
        Ok(())
    }

    fn step<R: Rng + ?Sized>(&mut self, grid: &Grid, view: &PursuitView, rng: &mut R) -> Result<(), EntityError> {
        let current = self.cell(grid);

        // Decisions are made once per cell, on arrival at its center
        if current == self.target && self.at_center {
            self.decide(grid, view, rng)?;
        }

        self.approach_target(grid);
        self.tick_countdown(grid)
    }

    /// Chooses the next target cell.
    fn decide<R: Rng + ?Sized>(&mut self, grid: &Grid, view: &PursuitView, rng: &mut R) -> Result<(), EntityError> {
        let current = self.cell(grid);

        if self.mode == Mode::Returning && current == grid.home() {
            self.transition(Mode::Chasing)?;
            self.target = grid.pen_exit();
            return Ok(());
        }

        let possibles = grid.neighbors(current, self.mode == Mode::Returning)?;
        let came_from = current - self.mover.direction.as_ivec2();
        let possibles_no_reverse: SmallVec<[IVec2; 4]> =
            possibles.iter().copied().filter(|&cell| cell != came_from).collect();

        let next = match possibles.len() {
            0 => return Err(EntityError::NoLegalMove(current)),
            1 if current.x == 0 || current.x == grid.width() - 1 => {
                self.wrap_through_tunnel(grid, possibles[0]);
                return Ok(());
            }
            // A dead end: turn around
            1 => Some(possibles[0]),
            // A corridor: keep going
            2 => possibles_no_reverse.first().copied(),
            // A junction
            _ => match self.mode {
                Mode::Chasing => {
                    let context = TargetContext {
                        player_cell: view.player_cell,
                        player_direction: view.player_direction,
                        reference_cell: view.reference_cell,
                        own_cell: current,
                    };
                    self.strategy.choose(&possibles_no_reverse, &context)
                }
                Mode::Frightened => possibles_no_reverse.choose(rng).copied(),
                Mode::Returning => next_step(&possibles_no_reverse, grid.home()),
                Mode::Caged => grid.pen_cells().choose(rng).copied(),
            },
        };

        self.target = next.ok_or(EntityError::NoLegalMove(current))?;
        trace!(pursuer = self.id, mode = %self.mode, from = %current, to = %self.target, "Pursuer chose next cell");
        Ok(())
    }

    /// Jumps to the cell on the other side of the tunnel and heads one cell further in, so the
    /// pursuer does not immediately wrap back.
    fn wrap_through_tunnel(&mut self, grid: &Grid, destination: IVec2) {
        let inward = if destination.x == 0 {
            Direction::Right
        } else {
            Direction::Left
        };

        self.mover.position = grid.to_position(destination);
        self.mover.direction = inward;
        self.target = destination + inward.as_ivec2();
        trace!(pursuer = self.id, to = %destination, "Pursuer wrapped through tunnel");
    }

    /// Walks towards the center of the target cell, one step per unfinished axis.
    fn approach_target(&mut self, grid: &Grid) {
        let multiplier = speed_multiplier(self.mode);
        let tolerance = arrival_tolerance(self.mover.speed, multiplier);
        let center = grid.to_position(self.target);

        let centered_x = (center.x - self.mover.position.x).abs() <= tolerance;
        let centered_y = (center.y - self.mover.position.y).abs() <= tolerance;
        self.at_center = centered_x && centered_y;

        let step = self.mover.speed * multiplier;

        // A step never carries the pursuer past the center it is heading for
        if !centered_x {
            self.mover.direction = if center.x > self.mover.position.x {
                Direction::Right
            } else {
                Direction::Left
            };
            if (center.x - self.mover.position.x).abs() <= step {
                self.mover.position.x = center.x;
            } else {
                self.mover.advance(grid, multiplier);
            }
        }

        if !centered_y {
            self.mover.direction = if center.y > self.mover.position.y {
                Direction::Down
            } else {
                Direction::Up
            };
            if (center.y - self.mover.position.y).abs() <= step {
                self.mover.position.y = center.y;
            } else {
                self.mover.advance(grid, multiplier);
            }
        }
    }

    fn tick_countdown(&mut self, grid: &Grid) -> Result<(), EntityError> {
        if self.mode != Mode::Frightened {
            return Ok(());
        }

        self.frighten_countdown = self.frighten_countdown.saturating_sub(1);
        if self.frighten_countdown == 0 {
            let next = if grid.is_in_pen(self.cell(grid)) {
                Mode::Caged
            } else {
                Mode::Chasing
            };
            self.transition(next)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Mode::Caged, Mode::Chasing),
            (Mode::Caged, Mode::Frightened),
            (Mode::Chasing, Mode::Frightened),
            (Mode::Frightened, Mode::Frightened),
            (Mode::Frightened, Mode::Chasing),
            (Mode::Frightened, Mode::Caged),
            (Mode::Frightened, Mode::Returning),
            (Mode::Returning, Mode::Chasing),
        ];

        for from in Mode::iter() {
            for to in Mode::iter() {
                assert_eq!(
                    from.can_transition(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_mode_repr_matches_persisted_values() {
        assert_eq!(Mode::from_repr(0), Some(Mode::Caged));
        assert_eq!(Mode::from_repr(2), Some(Mode::Frightened));
        assert_eq!(Mode::Returning as u8, 3);
        assert_eq!(Mode::from_repr(4), None);
    }
}
