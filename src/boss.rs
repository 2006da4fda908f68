//! The boss: a fighter with a shuffled vertical move pattern, a tick-limited
//! shield and a random fireball gate.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actors::{damage_fighter, Destructible};
use crate::entities::{Body, Projectile, ProjectileKind};
use crate::events::GameEvent;

const INITIAL_X: f64 = 1120.0;
const INITIAL_Y: f64 = 450.0;
pub const BOSS_SIZE: f64 = 170.0;
pub const BOSS_HEALTH: u32 = 10;
const VERTICAL_VELOCITY: f64 = 8.0;
const MOVE_FREQUENCY_PER_CYCLE: usize = 5;
const MAX_FRAMES_WITH_SAME_MOVE: u32 = 10;
const Y_UPPER_BOUND: f64 = -15.0;
const Y_LOWER_BOUND: f64 = 475.0;
pub const MAX_FRAMES_WITH_SHIELD: u32 = 50;
const FIREBALL_X: f64 = 950.0;

#[derive(Clone, Debug)]
pub struct Boss {
    pub body: Body,
    pub health: u32,
    move_pattern: Vec<f64>,
    index_of_current_move: usize,
    consecutive_moves_in_same_direction: u32,
    shielded: bool,
    frames_with_shield_activated: u32,
    fire_rate: f64,
    shield_probability: f64,
}

impl Boss {
    pub fn new(rng: &mut impl Rng, fire_rate: f64, shield_probability: f64) -> Self {
        let mut move_pattern = Vec::with_capacity(MOVE_FREQUENCY_PER_CYCLE * 3);
        for _ in 0..MOVE_FREQUENCY_PER_CYCLE {
            move_pattern.push(VERTICAL_VELOCITY);
            move_pattern.push(-VERTICAL_VELOCITY);
            move_pattern.push(0.0);
        }
        move_pattern.shuffle(rng);

        Self {
            body: Body::new(INITIAL_X, INITIAL_Y, BOSS_SIZE, BOSS_SIZE),
            health: BOSS_HEALTH,
            move_pattern,
            index_of_current_move: 0,
            consecutive_moves_in_same_direction: 0,
            shielded: false,
            frames_with_shield_activated: 0,
            fire_rate,
            shield_probability,
        }
    }

    /// Apply the next pattern move; a move that leaves the vertical band is
    /// undone and the pattern starts over.
    pub fn update_position(&mut self, rng: &mut impl Rng) {
        let before = self.body.translate_y;
        let delta = self.next_move(rng);
        self.body.translate_y += delta;
        if self.is_out_of_bounds() {
            self.body.translate_y = before;
            self.reset_move_pattern(rng);
        }
    }

    pub fn update_actor(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        self.update_position(rng);
        if let Some(event) = self.update_shield(rng) {
            events.push(event);
        }
    }

    /// Advance the shield timer by one tick. Returns the toggle, if any.
    pub fn update_shield(&mut self, rng: &mut impl Rng) -> Option<GameEvent> {
        let mut event = None;
        if self.shielded {
            self.frames_with_shield_activated += 1;
        } else if rng.gen::<f64>() < self.shield_probability {
            self.activate_shield();
            event = Some(GameEvent::ShieldActivated);
        }
        if self.frames_with_shield_activated == MAX_FRAMES_WITH_SHIELD {
            self.deactivate_shield();
            event = Some(GameEvent::ShieldDeactivated);
        }
        event
    }

    pub fn fire_projectile(&self, rng: &mut impl Rng) -> Option<Projectile> {
        if rng.gen::<f64>() < self.fire_rate {
            Some(Projectile::new(
                ProjectileKind::Fireball,
                FIREBALL_X,
                self.body.y() + BOSS_SIZE / 2.0,
            ))
        } else {
            None
        }
    }

    pub fn activate_shield(&mut self) {
        debug!("Boss shield up");
        self.shielded = true;
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    pub fn frames_with_shield_activated(&self) -> u32 {
        self.frames_with_shield_activated
    }

    pub fn move_pattern(&self) -> &[f64] {
        &self.move_pattern
    }

    pub fn index_of_current_move(&self) -> usize {
        self.index_of_current_move
    }

    pub fn health_fraction(&self) -> f64 {
        self.health as f64 / BOSS_HEALTH as f64
    }

    fn deactivate_shield(&mut self) {
        debug!("Boss shield down");
        self.shielded = false;
        self.frames_with_shield_activated = 0;
    }

    fn next_move(&mut self, rng: &mut impl Rng) -> f64 {
        let current = self.move_pattern[self.index_of_current_move];
        self.consecutive_moves_in_same_direction += 1;
        if self.consecutive_moves_in_same_direction == MAX_FRAMES_WITH_SAME_MOVE {
            self.move_pattern.shuffle(rng);
            self.consecutive_moves_in_same_direction = 0;
            self.index_of_current_move =
                (self.index_of_current_move + 1) % self.move_pattern.len();
        }
        current
    }

    /// Start the pattern over from a fresh shuffle.
    fn reset_move_pattern(&mut self, rng: &mut impl Rng) {
        self.move_pattern.shuffle(rng);
        self.consecutive_moves_in_same_direction = 0;
        self.index_of_current_move = 0;
    }

    fn is_out_of_bounds(&self) -> bool {
        let y = self.body.y();
        y < Y_UPPER_BOUND || y > Y_LOWER_BOUND
    }
}

impl Destructible for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Absorbed entirely while the shield is up.
    fn take_damage(&mut self) {
        if !self.shielded {
            damage_fighter(&mut self.body, &mut self.health);
        }
    }
}
