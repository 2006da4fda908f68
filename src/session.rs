//! Owns the running level, feeds it ticks and performs level transitions.

use log::{info, warn};
use rand::Rng;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{LevelState, LevelStatus};
use crate::error::GameError;
use crate::events::{GameEvent, TickResult};
use crate::levels::{LevelId, LevelParams, LevelRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    Won,
    Lost,
}

pub struct Session<R: Rng> {
    config: GameConfig,
    registry: LevelRegistry,
    rng: R,
    level: LevelState,
    status: SessionStatus,
    paused: bool,
    /// Kills banked from levels already cleared.
    banked_kills: u32,
    events: Vec<GameEvent>,
}

impl<R: Rng> Session<R> {
    /// Start a session at level one.
    pub fn new(config: GameConfig, registry: LevelRegistry, rng: R) -> Result<Self, GameError> {
        Self::start_at(config, registry, rng, LevelId::One)
    }

    pub fn start_at(
        config: GameConfig,
        registry: LevelRegistry,
        rng: R,
        id: LevelId,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let level = registry.build(id, &LevelParams::fresh(&config))?;
        Ok(Self {
            config,
            registry,
            rng,
            level,
            status: SessionStatus::Playing,
            paused: false,
            banked_kills: 0,
            events: Vec::new(),
        })
    }

    /// Run one tick of the current level, unless paused or finished.
    ///
    /// A failed transition returns the error and puts the current level back
    /// in play. It keeps running, and the transition is retried every tick its
    /// end condition still holds.
    pub fn tick(&mut self) -> Result<TickResult, GameError> {
        if self.paused || self.status != SessionStatus::Playing {
            return Ok(TickResult::Stopped);
        }
        let result = compute::tick(&mut self.level, &mut self.rng);
        self.events.extend(compute::drain_events(&mut self.level));

        match result {
            TickResult::Transition(next) => {
                if let Err(err) = self.go_to_level(next) {
                    warn!("Could not load {}: {}", next, err);
                    self.level.status = LevelStatus::Playing;
                    return Err(err);
                }
            }
            TickResult::Win => self.status = SessionStatus::Won,
            TickResult::Lose => self.status = SessionStatus::Lost,
            TickResult::Continue | TickResult::Stopped => {}
        }
        Ok(result)
    }

    /// Replace the current level with a freshly built `id`.
    pub fn go_to_level(&mut self, id: LevelId) -> Result<(), GameError> {
        let player_health = if self.config.carry_over_health && self.level.player.health > 0 {
            self.level.player.health
        } else {
            self.config.player_initial_health
        };
        let params = LevelParams {
            config: self.config.clone(),
            player_health,
        };
        let next = self.registry.build(id, &params)?;

        self.banked_kills += self.level.player.kills;
        self.level = next;
        self.status = SessionStatus::Playing;
        info!("Now playing {}", id);
        Ok(())
    }

    pub fn pause(&mut self) {
        if !self.paused {
            info!("Paused");
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            info!("Resumed");
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    /// Input intents go through here.
    pub fn level_mut(&mut self) -> &mut LevelState {
        &mut self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Kills across every level played so far, the current one included.
    pub fn total_kills(&self) -> u32 {
        self.banked_kills + self.level.player.kills
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
