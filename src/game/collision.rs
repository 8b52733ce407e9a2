//! Resolves what happens when the player and a pursuer share a cell.

use tracing::debug;

use crate::constants::CAPTURE_BASE_SCORE;
use crate::entity::ghost::{Mode, Pursuer};
use crate::entity::player::Player;
use crate::error::EntityError;
use crate::events::GameEvent;
use crate::map::grid::Grid;

/// Points for the `captures`-th capture (zero-based) within one panic window.
///
/// Doubles with every capture: 200, 400, 800, 1600, ...
pub fn capture_award(captures: u32) -> u32 {
    CAPTURE_BASE_SCORE.saturating_mul(1u32.checked_shl(captures).unwrap_or(u32::MAX))
}

/// Checks every pursuer against the player.
///
/// A chasing pursuer in the player's cell catches the player; a frightened one is captured and
/// starts returning to the pen. Caged and returning pursuers pass through harmlessly.
/// `captures` counts captures in the current panic window and is advanced for each capture.
pub fn resolve(
    grid: &Grid,
    player: &mut Player,
    pursuers: &mut [Pursuer],
    captures: &mut u32,
) -> Result<Vec<GameEvent>, EntityError> {
    let player_cell = player.cell(grid);
    let mut events = Vec::new();

    for pursuer in pursuers.iter_mut() {
        if pursuer.cell(grid) != player_cell {
            continue;
        }

        match pursuer.mode() {
            Mode::Chasing if player.is_alive() => {
                player.kill();
                events.push(GameEvent::PlayerCaught { by: pursuer.id() });
            }
            Mode::Frightened => {
                pursuer.capture()?;
                let award = capture_award(*captures);
                *captures += 1;
                debug!(pursuer = pursuer.id(), award, "Pursuer captured");
                events.push(GameEvent::PursuerCaptured { id: pursuer.id(), award });
            }
            _ => {}
        }
    }

    Ok(events)
}
