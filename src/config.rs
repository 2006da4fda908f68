//! Game tunables, loaded from a RON file.
//!
//! The struct is `#[serde(default)]`, so a config file only names the values it
//! overrides; anything missing falls back to `GameConfig::default()`.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World width in simulation units.
    pub screen_width: f64,
    pub screen_height: f64,
    /// Period of one simulation tick.
    pub tick_millis: u64,
    pub player_initial_health: u32,
    /// Kills required in level one before advancing.
    pub kills_to_advance: u32,
    /// Maximum enemy planes alive at once in level one.
    pub total_enemies: usize,
    pub enemy_spawn_interval_ticks: u32,
    pub enemy_fire_rate: f64,
    pub boss_fire_rate: f64,
    pub boss_shield_probability: f64,
    pub bomb_spawn_interval_ticks: u32,
    pub max_bombs: usize,
    /// Start each new level with the hearts left over from the previous one.
    pub carry_over_health: bool,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1300.0,
            screen_height: 750.0,
            tick_millis: 50,
            player_initial_health: 5,
            kills_to_advance: 5,
            total_enemies: 10,
            enemy_spawn_interval_ticks: 20,
            enemy_fire_rate: 0.01,
            boss_fire_rate: 0.04,
            boss_shield_probability: 0.05,
            bomb_spawn_interval_ticks: 40,
            max_bombs: 3,
            carry_over_health: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate a config from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "screen dimensions must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::Invalid("tick_millis must be non-zero".into()));
        }
        if self.player_initial_health == 0 {
            return Err(ConfigError::Invalid(
                "player_initial_health must be non-zero".into(),
            ));
        }
        let rates = [
            ("enemy_fire_rate", self.enemy_fire_rate),
            ("boss_fire_rate", self.boss_fire_rate),
            ("boss_shield_probability", self.boss_shield_probability),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must lie in [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}
