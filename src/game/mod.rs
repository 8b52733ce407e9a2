//! The game world: one grid, one player, four pursuers, and the rules that tie them together.

use std::fs;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{FRUIT_PELLET_COUNTS, RAW_BOARD, RELEASE_SCHEDULE};
use crate::entity::ghost::{Mode, Pursuer, PursuitView};
use crate::entity::player::Player;
use crate::error::{EntityError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::map::direction::Direction;
use crate::map::grid::{FruitKind, Grid, Pickup};

pub mod collision;
pub mod save;

/// Number of pursuers in every level.
pub const PURSUER_COUNT: usize = 4;

/// Where the world is in its round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Entities are frozen until the countdown runs out.
    Countdown {
        remaining: u32,
        /// Whether the leading pursuer is released when the countdown ends.
        release_leader: bool,
    },
    Playing,
    GameOver,
}

/// The complete simulation state.
pub struct World {
    config: Config,
    /// The board as loaded, used to rebuild the grid for each level.
    layout: Grid,
    grid: Grid,
    player: Player,
    pursuers: Vec<Pursuer>,
    rng: SmallRng,
    level: u32,
    score: u32,
    /// Captures made during the current panic window.
    captures: u32,
    last_pellets_eaten: usize,
    extra_life_awarded: bool,
    phase: Phase,
    paused: bool,
    ticks: u64,
    events: Vec<GameEvent>,
}

impl World {
    /// Creates a world on the given board, seeding the RNG from the config (or the OS).
    pub fn new(layout: Grid, config: Config) -> GameResult<Self> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::with_rng(layout, config, rng)
    }

    /// Creates a world with an explicit RNG.
    pub fn with_rng(layout: Grid, config: Config, rng: SmallRng) -> GameResult<Self> {
        let speed = config.speed_for_level(0);
        let player = Player::new(&layout, speed, config.starting_lives);
        let pursuers = spawn_pursuers(&layout, speed)?;
        let phase = Phase::Countdown {
            remaining: config.countdown_ticks(),
            release_leader: true,
        };

        info!(
            width = layout.width(),
            height = layout.height(),
            pellets = layout.pellets_remaining(),
            "World created"
        );

        Ok(Self {
            grid: layout.clone(),
            layout,
            player,
            pursuers,
            rng,
            level: 0,
            score: 0,
            captures: 0,
            last_pellets_eaten: 0,
            extra_life_awarded: false,
            phase,
            paused: false,
            ticks: 0,
            events: Vec::new(),
            config,
        })
    }

    /// Creates a world on the board named by the config, or the built-in board.
    pub fn from_config(config: Config) -> GameResult<Self> {
        let layout = match &config.map_path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
                Grid::new(rows.as_slice())?
            }
            None => Grid::new(&RAW_BOARD)?,
        };
        Self::new(layout, config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &Grid {
        &self.layout
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn pursuer(&self, id: usize) -> Option<&Pursuer> {
        self.pursuers.get(id)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.player.lives()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current entity speed.
    pub fn speed(&self) -> f32 {
        self.config.speed_for_level(self.level)
    }

    /// Applies a command from outside the simulation.
    pub fn apply(&mut self, command: GameCommand) -> GameResult<()> {
        debug!(?command, "Applying command");
        match command {
            GameCommand::Steer(direction) => self.steer(direction),
            GameCommand::TriggerPanic => self.trigger_panic()?,
            GameCommand::ReleasePursuer(id) => self.release_pursuer(id)?,
            GameCommand::Pause => self.paused = true,
            GameCommand::Resume => self.paused = false,
            GameCommand::TogglePause => self.paused = !self.paused,
        }
        Ok(())
    }

    /// Turns the player. Ignored while paused.
    pub fn steer(&mut self, direction: Direction) {
        if !self.paused {
            self.player.steer(direction);
        }
    }

    /// Frightens every pursuer that is not already heading home, and restarts the capture chain.
    pub fn trigger_panic(&mut self) -> GameResult<()> {
        let ticks = self.config.panic_ticks_for_level(self.level);
        for pursuer in &mut self.pursuers {
            pursuer.frighten(ticks)?;
        }
        self.captures = 0;
        self.events.push(GameEvent::PanicStarted);
        debug!(ticks, "Panic started");
        Ok(())
    }

    /// Lets a caged pursuer out.
    pub fn release_pursuer(&mut self, id: usize) -> GameResult<()> {
        let pursuer = self.pursuers.get_mut(id).ok_or(EntityError::UnknownPursuer(id))?;
        pursuer.release(&self.grid)?;
        self.events.push(GameEvent::PursuerReleased(id));
        Ok(())
    }

    /// Advances the simulation by one tick and returns what happened.
    pub fn tick(&mut self) -> GameResult<Vec<GameEvent>> {
        if self.paused || self.phase == Phase::GameOver {
            return Ok(std::mem::take(&mut self.events));
        }
        self.ticks += 1;

        if let Phase::Countdown {
            remaining,
            release_leader,
        } = self.phase
        {
            self.tick_countdown(remaining, release_leader)?;
            return Ok(std::mem::take(&mut self.events));
        }

        if !self.player.is_alive() {
            self.handle_death()?;
            return Ok(std::mem::take(&mut self.events));
        }

        if let Some(fruit) = self.grid.tick_fruit() {
            self.events.push(GameEvent::FruitExpired(fruit));
        }

        self.player.tick(&self.grid);
        self.collect_pickups()?;

        if self.grid.pellets_remaining() == 0 {
            self.advance_level()?;
            return Ok(std::mem::take(&mut self.events));
        }

        self.update_pursuers()?;

        let hits = collision::resolve(&self.grid, &mut self.player, &mut self.pursuers, &mut self.captures)?;
        for hit in &hits {
            if let GameEvent::PursuerCaptured { award, .. } = hit {
                self.add_score(*award);
            }
        }
        self.events.extend(hits);

        Ok(std::mem::take(&mut self.events))
    }

    fn tick_countdown(&mut self, remaining: u32, release_leader: bool) -> GameResult<()> {
        if remaining > 1 {
            self.phase = Phase::Countdown {
                remaining: remaining - 1,
                release_leader,
            };
            return Ok(());
        }

        // The leader may already be out if it was released or frightened during the countdown
        let release_leader = release_leader && self.pursuers[0].mode() == Mode::Caged;
        self.phase = Phase::Playing;
        self.events.push(GameEvent::RoundStarted);
        if release_leader {
            self.release_pursuer(0)?;
        }
        Ok(())
    }

    fn handle_death(&mut self) -> GameResult<()> {
        if self.player.lives() == 0 {
            info!(score = self.score, level = self.level, "Game over");
            self.phase = Phase::GameOver;
            self.events.push(GameEvent::GameOver);
            return Ok(());
        }

        debug!(lives = self.player.lives(), "Respawning");
        self.respawn()
    }

    /// Recreates the entities on the current grid and starts a countdown.
    fn respawn(&mut self) -> GameResult<()> {
        let speed = self.speed();
        self.player = Player::new(&self.grid, speed, self.player.lives());
        self.pursuers = spawn_pursuers(&self.grid, speed)?;
        self.captures = 0;
        self.phase = Phase::Countdown {
            remaining: self.config.countdown_ticks(),
            release_leader: true,
        };
        Ok(())
    }

    fn advance_level(&mut self) -> GameResult<()> {
        self.level += 1;
        info!(level = self.level, score = self.score, "Level complete");
        self.events.push(GameEvent::LevelComplete { level: self.level });

        self.grid = self.layout.clone();
        self.last_pellets_eaten = 0;
        self.respawn()
    }

    fn collect_pickups(&mut self) -> GameResult<()> {
        let cell = self.player.cell(&self.grid);
        if !self.grid.contains(cell) {
            return Ok(());
        }

        if let Some(pickup) = self.grid.consume(cell)? {
            self.add_score(pickup.score());
            match pickup {
                Pickup::Pellet => self.events.push(GameEvent::PelletEaten(cell)),
                Pickup::PowerPellet => {
                    self.events.push(GameEvent::PowerPelletEaten(cell));
                    self.trigger_panic()?;
                }
                Pickup::Fruit(fruit) => self.events.push(GameEvent::FruitEaten {
                    fruit,
                    award: fruit.score_bonus(),
                }),
            }
        }

        let eaten = self.grid.pellets_eaten();
        if eaten != self.last_pellets_eaten {
            self.last_pellets_eaten = eaten;
            self.on_pellet_count(eaten)?;
        }
        Ok(())
    }

    /// Fires at most one scheduled release or fruit spawn for the new pellet count.
    fn on_pellet_count(&mut self, eaten: usize) -> GameResult<()> {
        let release = RELEASE_SCHEDULE
            .iter()
            .find(|&&(id, threshold)| eaten >= threshold && self.pursuers[id].mode() == Mode::Caged);
        if let Some(&(id, _)) = release {
            return self.release_pursuer(id);
        }

        let [first_fruit, second_fruit] = FRUIT_PELLET_COUNTS;
        if eaten == first_fruit || (eaten == second_fruit && self.grid.fruit().is_none()) {
            let fruit = FruitKind::for_level(self.level);
            if self.grid.place_fruit(fruit, self.config.fruit_ticks()) {
                debug!(fruit = fruit.as_ref(), "Fruit spawned");
                self.events.push(GameEvent::FruitSpawned(fruit));
            }
        }
        Ok(())
    }

    fn update_pursuers(&mut self) -> GameResult<()> {
        let view = PursuitView {
            player_cell: self.player.cell(&self.grid),
            player_direction: self.player.direction(),
            reference_cell: self.pursuers[0].cell(&self.grid),
        };

        for pursuer in &mut self.pursuers {
            let before = pursuer.mode();
            match pursuer.update(&self.grid, &view, &mut self.rng) {
                Ok(()) => {}
                Err(error @ EntityError::InvalidModeTransition { .. }) => return Err(error.into()),
                Err(error) => {
                    warn!(pursuer = pursuer.id(), %error, "Pursuer update rejected");
                    continue;
                }
            }

            if before == Mode::Returning && pursuer.mode() == Mode::Chasing {
                self.events.push(GameEvent::PursuerRecovered(pursuer.id()));
            }
        }
        Ok(())
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if !self.extra_life_awarded && self.score >= self.config.extra_life_score {
            self.extra_life_awarded = true;
            self.player.gain_life();
            info!(score = self.score, "Extra life awarded");
            self.events.push(GameEvent::ExtraLife);
        }
    }
}

fn spawn_pursuers(grid: &Grid, speed: f32) -> Result<Vec<Pursuer>, EntityError> {
    (0..PURSUER_COUNT).map(|id| Pursuer::new(id, grid, speed)).collect()
}
