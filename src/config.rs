use std::path::PathBuf;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_SPEED, SPEED_PER_LEVEL, TICKS_PER_SECOND};

/// Tunable rules and driver settings.
///
/// Every field has a default; any of them can be overridden with a `PURSUIT_`-prefixed
/// environment variable, e.g. `PURSUIT_TICK_RATE=60`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Distance covered per tick on the first level
    pub base_speed: f32,
    /// Speed added for every completed level
    pub speed_per_level: f32,
    /// How long pursuers stay frightened on the first level
    pub panic_seconds: u32,
    /// Floor for the frightened duration as levels shorten it
    pub min_panic_seconds: u32,
    pub starting_lives: u32,
    /// Score at which the single extra life is awarded
    pub extra_life_score: u32,
    /// Frozen time before each start and respawn
    pub countdown_seconds: u32,
    /// How long a fruit stays in the socket
    pub fruit_seconds: u32,
    /// Fixed RNG seed; random if unset
    pub seed: Option<u64>,
    /// Stop the headless driver after this many ticks
    pub max_ticks: Option<u64>,
    /// Board file to load instead of the built-in board
    pub map_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: TICKS_PER_SECOND,
            base_speed: BASE_SPEED,
            speed_per_level: SPEED_PER_LEVEL,
            panic_seconds: 10,
            min_panic_seconds: 1,
            starting_lives: 3,
            extra_life_score: 10_000,
            countdown_seconds: 3,
            fruit_seconds: 10,
            seed: None,
            max_ticks: None,
            map_path: None,
        }
    }
}

impl Config {
    /// The layered configuration source: defaults, then the environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("PURSUIT_"))
    }

    /// Loads and validates the configuration.
    pub fn load() -> Result<Config, figment::Error> {
        let config: Config = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), figment::Error> {
        if self.tick_rate == 0 {
            return Err(figment::Error::from("tick_rate must be positive".to_string()));
        }
        if self.base_speed.is_nan() || self.base_speed <= 0.0 || !self.speed_per_level.is_finite() || self.speed_per_level < 0.0 {
            return Err(figment::Error::from(
                "base_speed must be positive and speed_per_level non-negative".to_string(),
            ));
        }
        // The entity box must not be able to step over a whole wall cell
        if self.base_speed >= crate::constants::CELL_SIZE / 2.0 {
            return Err(figment::Error::from(format!(
                "base_speed {} is too fast for the cell size",
                self.base_speed
            )));
        }
        if self.min_panic_seconds == 0 || self.min_panic_seconds > self.panic_seconds {
            return Err(figment::Error::from(
                "min_panic_seconds must be at least 1 and at most panic_seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Entity speed on the given level.
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.base_speed + self.speed_per_level * level as f32
    }

    /// Frightened duration, in ticks, on the given level.
    pub fn panic_ticks_for_level(&self, level: u32) -> u32 {
        self.panic_seconds.saturating_sub(level).max(self.min_panic_seconds) * self.tick_rate
    }

    pub fn countdown_ticks(&self) -> u32 {
        self.countdown_seconds * self.tick_rate
    }

    pub fn fruit_ticks(&self) -> u32 {
        self.fruit_seconds * self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_classic_rules() {
        let config = Config::default();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.speed_for_level(0), 3.0);
        assert_eq!(config.speed_for_level(2), 4.0);
        assert_eq!(config.panic_ticks_for_level(0), 300);
        assert_eq!(config.countdown_ticks(), 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_panic_duration_has_floor() {
        let config = Config::default();
        assert_eq!(config.panic_ticks_for_level(9), 30);
        assert_eq!(config.panic_ticks_for_level(40), 30);
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PURSUIT_TICK_RATE", "60");
            jail.set_env("PURSUIT_SEED", "7");

            let config = Config::load()?;
            assert_eq!(config.tick_rate, 60);
            assert_eq!(config.seed, Some(7));
            assert_eq!(config.starting_lives, 3);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PURSUIT_TICK_RATE", "0");
            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
