//! Persisting and restoring a world between sessions.
//!
//! A [`SaveState`] is a plain serde tree. Restoring validates it against the board layout before
//! anything is built from it, so a corrupt save can never produce a half-restored world.

use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::entity::ghost::{Mode, Pursuer};
use crate::entity::movement::Mover;
use crate::entity::player::Player;
use crate::error::{GameError, GameResult, SaveError};
use crate::game::{Phase, World, PURSUER_COUNT};
use crate::map::direction::Direction;
use crate::map::grid::{CellKind, Grid};

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub level: u32,
    pub score: u32,
    pub player: PlayerSave,
    pub pursuers: Vec<PursuerSave>,
    /// Cell contents, one row per entry.
    pub grid: Vec<Vec<CellKind>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub position: Vec2,
    pub direction: Direction,
    pub lives: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuerSave {
    pub position: Vec2,
    pub direction: Direction,
    pub target: IVec2,
    /// Persisted as its integer value, see [`Mode`].
    pub mode: u8,
    pub frighten_countdown: u32,
}

impl SaveState {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<SaveState, SaveError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&Pursuer> for PursuerSave {
    fn from(pursuer: &Pursuer) -> Self {
        Self {
            position: pursuer.position(),
            direction: pursuer.direction(),
            target: pursuer.target(),
            mode: pursuer.mode() as u8,
            frighten_countdown: pursuer.frighten_countdown(),
        }
    }
}

impl World {
    /// Captures the current state for persistence.
    pub fn to_save(&self) -> SaveState {
        let grid = self.grid();
        let width = grid.width().max(1) as usize;
        let cells: Vec<CellKind> = grid.cells().map(|(_, kind)| kind).collect();

        SaveState {
            level: self.level(),
            score: self.score(),
            player: PlayerSave {
                position: self.player().position(),
                direction: self.player().direction(),
                lives: self.player().lives(),
            },
            pursuers: self.pursuers().iter().map(PursuerSave::from).collect(),
            grid: cells.chunks(width).map(<[CellKind]>::to_vec).collect(),
        }
    }

    /// Rebuilds a world from a save, validating it against the board layout.
    ///
    /// The restored world starts in a countdown with every pursuer in its saved mode.
    pub fn from_save(layout: Grid, config: Config, save: SaveState, rng: SmallRng) -> GameResult<World> {
        let grid = restore_grid(&layout, &save.grid)?;
        let speed = config.speed_for_level(save.level);

        let player = restore_player(&grid, &save.player, speed)?;
        let pursuers = restore_pursuers(&grid, &save.pursuers, speed)?;

        let mut world = World::with_rng(layout, config, rng)?;
        world.level = save.level;
        world.score = save.score;
        world.extra_life_awarded = save.score >= world.config.extra_life_score;
        world.last_pellets_eaten = grid.pellets_eaten();
        world.grid = grid;
        world.player = player;
        world.pursuers = pursuers;
        // A save taken before the leader's release must still let it out
        world.phase = Phase::Countdown {
            remaining: world.config.countdown_ticks(),
            release_leader: world.pursuers[0].mode() == Mode::Caged,
        };

        info!(level = world.level, score = world.score, "World restored from save");
        Ok(world)
    }

    /// Restores from serialized save data, or starts a fresh game if the data is unusable.
    pub fn restore_or_new(layout: Grid, config: Config, json: &str) -> GameResult<World> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let restored = SaveState::from_json(json)
            .map_err(GameError::from)
            .and_then(|save| World::from_save(layout.clone(), config.clone(), save, rng));

        match restored {
            Ok(world) => Ok(world),
            Err(error) => {
                warn!(%error, "Save could not be restored, starting a new game");
                World::new(layout, config)
            }
        }
    }
}

fn corrupt(message: impl Into<String>) -> SaveError {
    SaveError::CorruptSaveState(message.into())
}

/// Rebuilds the grid from saved cells. Only the mutable parts of a cell may differ from the layout.
fn restore_grid(layout: &Grid, rows: &[Vec<CellKind>]) -> Result<Grid, SaveError> {
    if rows.len() != layout.height() as usize {
        return Err(corrupt(format!(
            "grid has {} rows, expected {}",
            rows.len(),
            layout.height()
        )));
    }

    let mut grid = layout.clone();
    for (y, row) in rows.iter().enumerate() {
        if row.len() != layout.width() as usize {
            return Err(corrupt(format!(
                "grid row {y} has {} cells, expected {}",
                row.len(),
                layout.width()
            )));
        }

        for (x, &saved) in row.iter().enumerate() {
            let cell = IVec2::new(x as i32, y as i32);
            let original = layout.classify(cell).map_err(|error| corrupt(error.to_string()))?;
            if !is_compatible(original, saved, cell == layout.fruit_socket()) {
                return Err(corrupt(format!("cell {cell} cannot change from {original:?} to {saved:?}")));
            }
            grid.set(cell, saved).map_err(|error| corrupt(error.to_string()))?;
        }
    }

    Ok(grid)
}

fn is_compatible(original: CellKind, saved: CellKind, is_socket: bool) -> bool {
    match (original, saved) {
        (CellKind::Wall, CellKind::Wall)
        | (CellKind::Empty, CellKind::Empty)
        | (CellKind::Void, CellKind::Void)
        | (CellKind::Pellet { .. }, CellKind::Pellet { .. })
        | (CellKind::PowerPellet { .. }, CellKind::PowerPellet { .. }) => true,
        (CellKind::Empty, CellKind::Fruit { remaining_ticks, .. }) => is_socket && remaining_ticks > 0,
        _ => false,
    }
}

fn check_position(grid: &Grid, position: Vec2, what: &str) -> Result<(), SaveError> {
    if !position.is_finite() || !grid.contains(grid.to_cell(position)) {
        return Err(corrupt(format!("{what} position {position} is off the grid")));
    }
    Ok(())
}

fn restore_player(grid: &Grid, save: &PlayerSave, speed: f32) -> Result<Player, SaveError> {
    check_position(grid, save.position, "player")?;
    if save.lives == 0 {
        return Err(corrupt("player has no lives left"));
    }
    Ok(Player::restore(save.position, save.direction, speed, save.lives))
}

fn restore_pursuers(grid: &Grid, saves: &[PursuerSave], speed: f32) -> Result<Vec<Pursuer>, SaveError> {
    if saves.len() != PURSUER_COUNT {
        return Err(corrupt(format!(
            "expected {PURSUER_COUNT} pursuers, found {}",
            saves.len()
        )));
    }

    saves
        .iter()
        .enumerate()
        .map(|(id, save)| {
            let mode = Mode::from_repr(save.mode)
                .ok_or_else(|| corrupt(format!("pursuer {id} has unknown mode {}", save.mode)))?;
            check_position(grid, save.position, "pursuer")?;
            if !grid.contains(save.target) {
                return Err(corrupt(format!("pursuer {id} targets {} outside the grid", save.target)));
            }
            if mode == Mode::Frightened && save.frighten_countdown == 0 {
                return Err(corrupt(format!("pursuer {id} is frightened with no time left")));
            }

            let countdown = if mode == Mode::Frightened { save.frighten_countdown } else { 0 };
            let mover = Mover::new(save.position, save.direction, speed);
            Pursuer::restore(id, mover, mode, save.target, countdown).map_err(|error| corrupt(error.to_string()))
        })
        .collect()
}
