//! The three levels: identity, spawn policy, end predicate, and the registry
//! the session builds them through.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;

use crate::actors::ENEMY_SPAWN_MARGIN;
use crate::boss::Boss;
use crate::compute::init_level;
use crate::config::GameConfig;
use crate::entities::{Bomb, EnemyPlane, EnemyUnit, LevelState, LevelStatus};
use crate::error::GameError;

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelId {
    One,
    Two,
    Three,
}

impl LevelId {
    pub fn name(&self) -> &'static str {
        match self {
            LevelId::One => "level-one",
            LevelId::Two => "level-two",
            LevelId::Three => "level-three",
        }
    }

    /// Background identity token for the renderer.
    pub fn background(&self) -> &'static str {
        match self {
            LevelId::One => "background1",
            LevelId::Two => "background2",
            LevelId::Three => "background3",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LevelId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "one" | "level-one" => Ok(LevelId::One),
            "2" | "two" | "level-two" => Ok(LevelId::Two),
            "3" | "three" | "level-three" => Ok(LevelId::Three),
            _ => Err(GameError::UnknownLevel(s.to_string())),
        }
    }
}

// ── Variant state ─────────────────────────────────────────────────────────────

/// Per-level bookkeeping for the spawn policy and end predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelVariant {
    /// Enemy planes on an interval, up to a concurrency cap.
    One { ticks_since_spawn: u32 },
    /// A single boss.
    Two { boss_spawned: bool, boss_defeated: bool },
    /// The boss again, plus falling bombs on their own timer.
    Three {
        boss_spawned: bool,
        boss_defeated: bool,
        ticks_since_bomb: u32,
    },
}

impl LevelVariant {
    pub fn for_level(id: LevelId, config: &GameConfig) -> Self {
        match id {
            // Primed so the very first tick spawns.
            LevelId::One => LevelVariant::One {
                ticks_since_spawn: config.enemy_spawn_interval_ticks,
            },
            LevelId::Two => LevelVariant::Two {
                boss_spawned: false,
                boss_defeated: false,
            },
            LevelId::Three => LevelVariant::Three {
                boss_spawned: false,
                boss_defeated: false,
                ticks_since_bomb: 0,
            },
        }
    }

    pub fn boss_defeated(&self) -> bool {
        match self {
            LevelVariant::One { .. } => false,
            LevelVariant::Two { boss_defeated, .. } | LevelVariant::Three { boss_defeated, .. } => {
                *boss_defeated
            }
        }
    }

    pub fn record_boss_defeat(&mut self) {
        match self {
            LevelVariant::One { .. } => {}
            LevelVariant::Two { boss_defeated, .. } | LevelVariant::Three { boss_defeated, .. } => {
                *boss_defeated = true;
            }
        }
    }
}

// ── Spawn policy ──────────────────────────────────────────────────────────────

/// Step 1 of the tick: introduce whatever the level's policy calls for.
pub fn spawn_enemy_units(state: &mut LevelState, rng: &mut impl Rng) {
    let config = &state.config;
    match &mut state.variant {
        LevelVariant::One { ticks_since_spawn } => {
            *ticks_since_spawn = ticks_since_spawn.saturating_add(1);
            let due = *ticks_since_spawn >= config.enemy_spawn_interval_ticks;
            if state.enemy_units.len() < config.total_enemies && due {
                let y = rng.gen::<f64>() * (config.screen_height - ENEMY_SPAWN_MARGIN).max(0.0);
                let plane = EnemyPlane::new(config.screen_width, y, config.enemy_fire_rate);
                debug!("Enemy plane spawned at y={:.1}", y);
                state.enemy_units.push(EnemyUnit::Plane(plane));
                *ticks_since_spawn = 0;
            }
        }
        LevelVariant::Two { boss_spawned, .. } => {
            spawn_boss_once(boss_spawned, &mut state.enemy_units, config, rng);
        }
        LevelVariant::Three {
            boss_spawned,
            ticks_since_bomb,
            ..
        } => {
            spawn_boss_once(boss_spawned, &mut state.enemy_units, config, rng);

            *ticks_since_bomb = ticks_since_bomb.saturating_add(1);
            if *ticks_since_bomb >= config.bomb_spawn_interval_ticks
                && state.bombs.len() < config.max_bombs
            {
                state.bombs.push(Bomb::spawn(rng, config.screen_width));
                debug!("Bomb dropped ({} falling)", state.bombs.len());
                *ticks_since_bomb = 0;
            }
        }
    }
}

fn spawn_boss_once(
    boss_spawned: &mut bool,
    enemy_units: &mut Vec<EnemyUnit>,
    config: &GameConfig,
    rng: &mut impl Rng,
) {
    if !*boss_spawned && enemy_units.is_empty() {
        let boss = Boss::new(rng, config.boss_fire_rate, config.boss_shield_probability);
        debug!("Boss enters");
        enemy_units.push(EnemyUnit::Boss(boss));
        *boss_spawned = true;
    }
}

// ── End predicate ─────────────────────────────────────────────────────────────

/// Step 8 of the tick: decide whether the level is over.
pub fn end_condition(state: &LevelState) -> Option<LevelStatus> {
    if state.player.body.destroyed {
        return Some(LevelStatus::Lost);
    }
    match &state.variant {
        LevelVariant::One { .. } if state.player.kills >= state.config.kills_to_advance => {
            Some(LevelStatus::Advanced(LevelId::Two))
        }
        LevelVariant::Two { boss_defeated, .. } if *boss_defeated => {
            Some(LevelStatus::Advanced(LevelId::Three))
        }
        LevelVariant::Three { boss_defeated, .. } if *boss_defeated => Some(LevelStatus::Won),
        _ => None,
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// What a level needs from whoever builds it.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelParams {
    pub config: GameConfig,
    /// Starting health, and the number of hearts shown.
    pub player_health: u32,
}

impl LevelParams {
    pub fn fresh(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
            player_health: config.player_initial_health,
        }
    }
}

pub type LevelConstructor = Box<dyn Fn(&LevelParams) -> LevelState>;

/// Maps level identifiers to constructors.
pub struct LevelRegistry {
    constructors: HashMap<LevelId, LevelConstructor>,
}

impl LevelRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, id: LevelId, constructor: F)
    where
        F: Fn(&LevelParams) -> LevelState + 'static,
    {
        self.constructors.insert(id, Box::new(constructor));
    }

    pub fn contains(&self, id: LevelId) -> bool {
        self.constructors.contains_key(&id)
    }

    pub fn build(&self, id: LevelId, params: &LevelParams) -> Result<LevelState, GameError> {
        let constructor = self
            .constructors
            .get(&id)
            .ok_or_else(|| GameError::UnknownLevel(id.to_string()))?;
        Ok(constructor(params))
    }

    /// Look a level up by its string key ("2", "two", "level-two").
    pub fn build_named(&self, key: &str, params: &LevelParams) -> Result<LevelState, GameError> {
        self.build(key.parse()?, params)
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for id in [LevelId::One, LevelId::Two, LevelId::Three] {
            registry.register(id, move |params| init_level(id, params));
        }
        registry
    }
}
