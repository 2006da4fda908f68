//! Per-entity behaviour: movement, damage and firing.
//!
//! Every type in the enemy, projectile and friendly collections implements
//! `Destructible`, which is the seam the collision pass works through.

use rand::Rng;

use crate::boss::Boss;
use crate::entities::{
    Body, Bomb, Bounds, EnemyPlane, EnemyUnit, Player, Projectile, ProjectileKind, Sprite, Visual,
};
use crate::events::GameEvent;

// ── Tables ────────────────────────────────────────────────────────────────────

const PLAYER_SIZE: f64 = 150.0;
const PLAYER_INITIAL_X: f64 = 5.0;
const PLAYER_INITIAL_Y: f64 = 300.0;
const PLAYER_VELOCITY: f64 = 8.0;
const PLAYER_Y_UPPER_BOUND: f64 = -40.0;
const PLAYER_Y_LOWER_BOUND: f64 = 600.0;
const PLAYER_X_LEFT_BOUND: f64 = 0.0;
const PLAYER_X_RIGHT_BOUND: f64 = 600.0;
/// Muzzle offset from the player's origin (gun position plus shot sprite offset).
const PLAYER_MUZZLE_X: f64 = 110.0 + 30.0;
const PLAYER_MUZZLE_Y: f64 = 20.0 + 60.0;

const ENEMY_SIZE: f64 = 100.0;
const ENEMY_VELOCITY: f64 = -6.0;
const ENEMY_HEALTH: u32 = 1;
const ENEMY_MUZZLE_X: f64 = -100.0;
const ENEMY_MUZZLE_Y: f64 = 25.0;

const BOMB_SIZE: f64 = 70.0;
const BOMB_FALL_SPEED: f64 = 5.0;

fn projectile_size(kind: ProjectileKind) -> f64 {
    match kind {
        ProjectileKind::Player => 30.0,
        ProjectileKind::Enemy => 60.0,
        ProjectileKind::Fireball => 30.0,
    }
}

fn projectile_velocity(kind: ProjectileKind) -> f64 {
    match kind {
        ProjectileKind::Player => 15.0,
        ProjectileKind::Enemy => -10.0,
        ProjectileKind::Fireball => -15.0,
    }
}

/// Vertical room an enemy plane needs below its spawn row.
pub const ENEMY_SPAWN_MARGIN: f64 = 150.0;

// ── Destructible ──────────────────────────────────────────────────────────────

/// Damage model shared by fighters and projectiles.
pub trait Destructible {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Apply one damage event. Must be a no-op on a destroyed entity.
    fn take_damage(&mut self);

    fn is_destroyed(&self) -> bool {
        self.body().destroyed
    }

    /// Idempotent.
    fn destroy(&mut self) {
        self.body_mut().destroyed = true;
    }

    fn bounds(&self) -> Bounds {
        self.body().bounds()
    }
}

/// Fighter damage: one point per event, floored at zero, destroyed at zero.
pub(crate) fn damage_fighter(body: &mut Body, health: &mut u32) {
    if body.destroyed {
        return;
    }
    *health = health.saturating_sub(1);
    if *health == 0 {
        body.destroyed = true;
    }
}

/// Move along one axis and undo the move when it lands outside `[lower, upper]`.
/// Returns whether the move was kept.
pub(crate) fn move_within(
    translate: &mut f64,
    layout: f64,
    delta: f64,
    lower: f64,
    upper: f64,
) -> bool {
    let before = *translate;
    *translate += delta;
    let position = layout + *translate;
    if position < lower || position > upper {
        *translate = before;
        return false;
    }
    true
}

// ── Player ────────────────────────────────────────────────────────────────────

impl Player {
    pub fn new(health: u32) -> Self {
        Self {
            body: Body::new(PLAYER_INITIAL_X, PLAYER_INITIAL_Y, PLAYER_SIZE, PLAYER_SIZE),
            health,
            kills: 0,
            vertical_multiplier: 0,
            horizontal_multiplier: 0,
            fire_requested: false,
        }
    }

    pub fn update_position(&mut self) {
        if self.vertical_multiplier != 0 {
            move_within(
                &mut self.body.translate_y,
                self.body.layout_y,
                PLAYER_VELOCITY * self.vertical_multiplier as f64,
                PLAYER_Y_UPPER_BOUND,
                PLAYER_Y_LOWER_BOUND,
            );
        }
        if self.horizontal_multiplier != 0 {
            move_within(
                &mut self.body.translate_x,
                self.body.layout_x,
                PLAYER_VELOCITY * self.horizontal_multiplier as f64,
                PLAYER_X_LEFT_BOUND,
                PLAYER_X_RIGHT_BOUND,
            );
        }
    }

    pub fn update_actor(&mut self) {
        self.update_position();
    }

    /// The player's gun never jams.
    pub fn fire_projectile(&self) -> Projectile {
        Projectile::new(
            ProjectileKind::Player,
            self.body.x() + PLAYER_MUZZLE_X,
            self.body.y() + PLAYER_MUZZLE_Y,
        )
    }

    pub fn move_up(&mut self) {
        self.vertical_multiplier = -1;
    }

    pub fn move_down(&mut self) {
        self.vertical_multiplier = 1;
    }

    pub fn move_left(&mut self) {
        self.horizontal_multiplier = -1;
    }

    pub fn move_right(&mut self) {
        self.horizontal_multiplier = 1;
    }

    pub fn stop(&mut self) {
        self.vertical_multiplier = 0;
        self.horizontal_multiplier = 0;
    }

    pub fn increment_kill_count(&mut self) {
        self.kills += 1;
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            visual: Visual::Player,
            bounds: self.body.bounds(),
        }
    }
}

impl Destructible for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn take_damage(&mut self) {
        damage_fighter(&mut self.body, &mut self.health);
    }
}

// ── Enemy plane ───────────────────────────────────────────────────────────────

impl EnemyPlane {
    pub fn new(x: f64, y: f64, fire_rate: f64) -> Self {
        Self {
            body: Body::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            health: ENEMY_HEALTH,
            fire_rate,
        }
    }

    pub fn update_position(&mut self) {
        self.body.translate_x += ENEMY_VELOCITY;
    }

    pub fn fire_projectile(&self, rng: &mut impl Rng) -> Option<Projectile> {
        if rng.gen::<f64>() < self.fire_rate {
            Some(Projectile::new(
                ProjectileKind::Enemy,
                self.body.x() + ENEMY_MUZZLE_X,
                self.body.y() + ENEMY_MUZZLE_Y,
            ))
        } else {
            None
        }
    }
}

impl Destructible for EnemyPlane {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn take_damage(&mut self) {
        damage_fighter(&mut self.body, &mut self.health);
    }
}

// ── Enemy unit dispatch ───────────────────────────────────────────────────────

impl EnemyUnit {
    pub fn update_actor(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        match self {
            EnemyUnit::Plane(plane) => plane.update_position(),
            EnemyUnit::Boss(boss) => boss.update_actor(rng, events),
        }
    }

    pub fn fire_projectile(&self, rng: &mut impl Rng) -> Option<Projectile> {
        match self {
            EnemyUnit::Plane(plane) => plane.fire_projectile(rng),
            EnemyUnit::Boss(boss) => boss.fire_projectile(rng),
        }
    }

    pub fn health(&self) -> u32 {
        match self {
            EnemyUnit::Plane(plane) => plane.health,
            EnemyUnit::Boss(boss) => boss.health,
        }
    }

    pub fn as_boss(&self) -> Option<&Boss> {
        match self {
            EnemyUnit::Boss(boss) => Some(boss),
            EnemyUnit::Plane(_) => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyUnit::Boss(_))
    }

    pub fn sprite(&self) -> Sprite {
        let visual = match self {
            EnemyUnit::Plane(_) => Visual::EnemyPlane,
            EnemyUnit::Boss(boss) => Visual::Boss {
                shielded: boss.is_shielded(),
            },
        };
        Sprite {
            visual,
            bounds: self.bounds(),
        }
    }
}

impl Destructible for EnemyUnit {
    fn body(&self) -> &Body {
        match self {
            EnemyUnit::Plane(plane) => &plane.body,
            EnemyUnit::Boss(boss) => &boss.body,
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            EnemyUnit::Plane(plane) => &mut plane.body,
            EnemyUnit::Boss(boss) => &mut boss.body,
        }
    }

    fn take_damage(&mut self) {
        match self {
            EnemyUnit::Plane(plane) => plane.take_damage(),
            EnemyUnit::Boss(boss) => boss.take_damage(),
        }
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

impl Projectile {
    pub fn new(kind: ProjectileKind, x: f64, y: f64) -> Self {
        let size = projectile_size(kind);
        Self {
            body: Body::new(x, y, size, size),
            kind,
        }
    }

    pub fn update_actor(&mut self) {
        self.body.translate_x += projectile_velocity(self.kind);
    }

    pub fn sprite(&self) -> Sprite {
        let visual = match self.kind {
            ProjectileKind::Player => Visual::PlayerShot,
            ProjectileKind::Enemy => Visual::EnemyShot,
            ProjectileKind::Fireball => Visual::Fireball,
        };
        Sprite {
            visual,
            bounds: self.body.bounds(),
        }
    }
}

impl Destructible for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Projectiles have no health: any hit finishes them.
    fn take_damage(&mut self) {
        self.destroy();
    }
}

// ── Bomb ──────────────────────────────────────────────────────────────────────

impl Bomb {
    /// Drop a new bomb at a random column along the top edge.
    pub fn spawn(rng: &mut impl Rng, screen_width: f64) -> Self {
        Self {
            body: Body::new(Self::random_column(rng, screen_width), 0.0, BOMB_SIZE, BOMB_SIZE),
        }
    }

    pub fn move_down(&mut self) {
        self.body.translate_y += BOMB_FALL_SPEED;
    }

    /// Send the bomb back to a fresh random spot on the top edge.
    pub fn reset(&mut self, rng: &mut impl Rng, screen_width: f64) {
        self.body.layout_x = Self::random_column(rng, screen_width);
        self.body.layout_y = 0.0;
        self.body.translate_x = 0.0;
        self.body.translate_y = 0.0;
    }

    pub fn has_fallen_past(&self, screen_height: f64) -> bool {
        self.body.y() > screen_height
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            visual: Visual::Bomb,
            bounds: self.body.bounds(),
        }
    }

    fn random_column(rng: &mut impl Rng, screen_width: f64) -> f64 {
        let span = (screen_width - BOMB_SIZE).max(0.0);
        rng.gen::<f64>() * span
    }
}
