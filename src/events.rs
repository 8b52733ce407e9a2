use glam::IVec2;

use crate::map::direction::Direction;
use crate::map::grid::FruitKind;

/// Input accepted by the simulation between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Turn the player. Takes effect on the next tick.
    Steer(Direction),
    /// Frighten every pursuer as if a power pellet had been eaten, without awarding points.
    TriggerPanic,
    /// Let a caged pursuer out early.
    ReleasePursuer(usize),
    Pause,
    Resume,
    TogglePause,
}

/// Something notable that happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The start countdown finished and play began.
    RoundStarted,
    PelletEaten(IVec2),
    PowerPelletEaten(IVec2),
    PanicStarted,
    PursuerReleased(usize),
    PursuerCaptured { id: usize, award: u32 },
    /// A captured pursuer reached the pen and is chasing again.
    PursuerRecovered(usize),
    PlayerCaught { by: usize },
    FruitSpawned(FruitKind),
    FruitEaten { fruit: FruitKind, award: u32 },
    FruitExpired(FruitKind),
    ExtraLife,
    LevelComplete { level: u32 },
    GameOver,
}
