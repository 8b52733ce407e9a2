use std::time::{Duration, Instant};

use anyhow::Context;
use glam::IVec2;
use pursuit::config::Config;
use pursuit::entity::movement::arrival_tolerance;
use pursuit::events::{GameCommand, GameEvent};
use pursuit::game::{Phase, World};
use pursuit::map::direction::Direction;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Stands in for a human: picks a random open direction at every cell, preferring not to turn back.
struct Wanderer {
    rng: SmallRng,
    last_cell: Option<IVec2>,
}

impl Wanderer {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
            None => SmallRng::from_os_rng(),
        };
        Self { rng, last_cell: None }
    }

    fn steer(&mut self, world: &World) -> Option<Direction> {
        let grid = world.grid();
        let player = world.player();
        let cell = player.cell(grid);

        // Only decide once per cell, near its center, and never mid-tunnel
        if self.last_cell == Some(cell)
            || cell.x <= 0
            || cell.x >= grid.width() - 1
            || !player.mover().is_centered(grid, arrival_tolerance(world.speed(), 1.0))
        {
            return None;
        }
        self.last_cell = Some(cell);

        let open: SmallVec<[Direction; 4]> = Direction::DIRECTIONS
            .into_iter()
            .filter(|&direction| matches!(grid.is_wall(cell + direction.as_ivec2()), Ok(false)))
            .collect();
        let forward: SmallVec<[Direction; 4]> = open
            .iter()
            .copied()
            .filter(|&direction| direction != player.direction().opposite())
            .collect();

        let choices = if forward.is_empty() { &open } else { &forward };
        choices.choose(&mut self.rng).copied()
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PelletEaten(_) => {}
        GameEvent::PursuerCaptured { id, award } => info!(pursuer = id, award, "Pursuer captured"),
        GameEvent::PlayerCaught { by } => info!(pursuer = by, "Player caught"),
        GameEvent::LevelComplete { level } => info!(level, "Level complete"),
        other => debug!(event = ?other, "Game event"),
    }
}

pub fn main() -> anyhow::Result<()> {
    // Setup tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("could not set global default subscriber")?;

    let config = Config::load().context("failed to load configuration")?;
    let mut pilot = Wanderer::new(config.seed);
    let mut world = World::from_config(config.clone()).context("failed to build world")?;

    let loop_time = Duration::from_secs(1) / config.tick_rate;
    info!("Starting simulation loop ({:.3}ms)", loop_time.as_secs_f32() * 1000.0);

    loop {
        let start = Instant::now();

        if world.phase() == Phase::Playing {
            if let Some(direction) = pilot.steer(&world) {
                world.apply(GameCommand::Steer(direction))?;
            }
        }

        for event in world.tick()? {
            log_event(&event);
        }

        if world.phase() == Phase::GameOver {
            break;
        }
        if config.max_ticks.is_some_and(|max| world.ticks() >= max) {
            info!(ticks = world.ticks(), "Tick limit reached");
            break;
        }

        if start.elapsed() < loop_time {
            spin_sleep::sleep(loop_time.saturating_sub(start.elapsed()));
        } else {
            warn!("Simulation loop behind schedule by: {:?}", start.elapsed() - loop_time);
        }
    }

    info!(
        score = world.score(),
        level = world.level(),
        lives = world.lives(),
        ticks = world.ticks(),
        "Simulation finished"
    );
    Ok(())
}
