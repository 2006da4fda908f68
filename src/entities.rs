//! Game entity types. Plain data plus geometry accessors; behaviour lives in
//! `actors`, `boss` and `compute`.

use crate::boss::Boss;
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::levels::{LevelId, LevelVariant};
use crate::view::LevelView;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Edges that touch count as an intersection.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.max_x < self.min_x
            || other.min_x > self.max_x
            || other.max_y < self.min_y
            || other.min_y > self.max_y)
    }
}

/// Shared state of every on-screen object.
///
/// Position is split into the fixed `layout` origin the object was spawned at
/// and the `translate` offset it has accumulated since. Penetration is judged
/// on the translation alone.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub layout_x: f64,
    pub layout_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub width: f64,
    pub height: f64,
    pub destroyed: bool,
}

impl Body {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            layout_x: x,
            layout_y: y,
            translate_x: 0.0,
            translate_y: 0.0,
            width,
            height,
            destroyed: false,
        }
    }

    pub fn x(&self) -> f64 {
        self.layout_x + self.translate_x
    }

    pub fn y(&self) -> f64 {
        self.layout_y + self.translate_y
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x(), self.y(), self.width, self.height)
    }
}

// ── Visual identity ───────────────────────────────────────────────────────────

/// Token telling the renderer what an entity looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visual {
    Player,
    EnemyPlane,
    Boss { shielded: bool },
    PlayerShot,
    EnemyShot,
    Fireball,
    Bomb,
}

/// One drawable entity, as handed to the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub visual: Visual,
    pub bounds: Bounds,
}

// ── Fighters ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: u32,
    pub kills: u32,
    /// -1 up, 0 still, 1 down.
    pub vertical_multiplier: i32,
    /// -1 left, 0 still, 1 right.
    pub horizontal_multiplier: i32,
    /// Set by the fire intent, consumed at the start of the next tick.
    pub fire_requested: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyPlane {
    pub body: Body,
    pub health: u32,
    /// Per-tick probability of firing.
    pub fire_rate: f64,
}

/// Anything living in the enemy collection.
#[derive(Clone, Debug)]
pub enum EnemyUnit {
    Plane(EnemyPlane),
    Boss(Boss),
}

// ── Projectiles & hazards ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Player,
    Enemy,
    Fireball,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
}

/// Level three's falling hazard. Not a fighter and never destroyed: a hit on
/// the player sends it back to the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Bomb {
    pub body: Body,
}

// ── Level state ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelStatus {
    Playing,
    Advanced(LevelId),
    Won,
    Lost,
}

/// Everything one level owns. The player is the sole friendly unit and is
/// kept in its own field; the other four collections are plain vectors whose
/// membership means "alive and on screen".
#[derive(Clone, Debug)]
pub struct LevelState {
    pub id: LevelId,
    pub variant: LevelVariant,
    pub config: GameConfig,
    pub player: Player,
    pub enemy_units: Vec<EnemyUnit>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub bombs: Vec<Bomb>,
    pub view: LevelView,
    /// Events raised since the collaborator last drained them.
    pub events: Vec<GameEvent>,
    pub status: LevelStatus,
    pub tick: u64,
}

impl LevelState {
    pub fn screen_width(&self) -> f64 {
        self.config.screen_width
    }

    pub fn screen_height(&self) -> f64 {
        self.config.screen_height
    }

    pub fn is_running(&self) -> bool {
        self.status == LevelStatus::Playing
    }
}
