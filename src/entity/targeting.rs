//! Targeting strategies used by Chasing pursuers at junctions.
//!
//! Each pursuer is bound to one [`Strategy`] at creation. A strategy turns the current view of the
//! board into a desired target cell; the pursuer then steps into whichever legal neighbour is closest
//! to that target. The target itself may lie outside the grid, it is only ever measured against.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, FromRepr};

use crate::constants::{AMBUSH_LOOKAHEAD, FLANK_SCALE, FLEE_CORNER, FLEE_DISTANCE};
use crate::map::direction::Direction;

/// Everything a strategy may look at when picking a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetContext {
    pub player_cell: IVec2,
    pub player_direction: Direction,
    /// The cell of the reference pursuer (the one bound to [`Strategy::Direct`]).
    pub reference_cell: IVec2,
    /// The cell of the pursuer asking.
    pub own_cell: IVec2,
}

/// The four targeting heuristics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Strategy {
    /// Heads straight for the player.
    Direct,
    /// Heads for a point ahead of the player.
    Ambush,
    /// Heads for the ambush point, pushed further out along the line from the reference pursuer.
    Flank,
    /// Chases from afar, but runs for a corner once it gets close.
    ProximityFlee,
}

type TargetFn = fn(&TargetContext) -> IVec2;

impl Strategy {
    /// Computes this strategy's desired target cell.
    pub fn target(self, context: &TargetContext) -> IVec2 {
        (self.function())(context)
    }

    /// Picks the candidate closest to this strategy's target.
    pub fn choose(self, candidates: &[IVec2], context: &TargetContext) -> Option<IVec2> {
        next_step(candidates, self.target(context))
    }

    const fn function(self) -> TargetFn {
        match self {
            Strategy::Direct => direct,
            Strategy::Ambush => ambush,
            Strategy::Flank => flank,
            Strategy::ProximityFlee => proximity_flee,
        }
    }
}

fn direct(context: &TargetContext) -> IVec2 {
    context.player_cell
}

fn ambush(context: &TargetContext) -> IVec2 {
    context.player_cell + context.player_direction.as_ivec2() * AMBUSH_LOOKAHEAD
}

fn flank(context: &TargetContext) -> IVec2 {
    let reference_to_player = context.player_cell - context.reference_cell;
    ambush(context) + reference_to_player * FLANK_SCALE
}

fn proximity_flee(context: &TargetContext) -> IVec2 {
    if distance(context.own_cell, context.player_cell) > FLEE_DISTANCE {
        context.player_cell
    } else {
        FLEE_CORNER
    }
}

/// Euclidean distance between two cells.
pub fn distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Returns the candidate closest to `target`. Ties go to the earliest candidate.
pub fn next_step(candidates: &[IVec2], target: IVec2) -> Option<IVec2> {
    let mut best: Option<(IVec2, f32)> = None;
    for &candidate in candidates {
        let candidate_distance = distance(candidate, target);
        match best {
            Some((_, best_distance)) if candidate_distance >= best_distance => {}
            _ => best = Some((candidate, candidate_distance)),
        }
    }
    best.map(|(cell, _)| cell)
}
