//! Level simulation.
//!
//! `tick` advances a `LevelState` by one fixed step. Each stage of the step is
//! also public so a caller can drive the pipeline one stage at a time. All
//! randomness comes through the injected `rng`, so a seeded generator gives a
//! reproducible run.
//!
//! Input intents (`move_player_*`, `player_fire`) only touch the player's
//! intent fields and are meant to be applied between ticks.

use log::{debug, info};
use rand::Rng;

use crate::actors::Destructible;
use crate::entities::{EnemyUnit, LevelState, LevelStatus, Player, Projectile, Sprite};
use crate::events::{GameEvent, TickResult};
use crate::levels::{end_condition, spawn_enemy_units, LevelId, LevelParams, LevelVariant};
use crate::view::LevelView;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh level: the player alone on screen, nothing spawned yet.
pub fn init_level(id: LevelId, params: &LevelParams) -> LevelState {
    info!("Starting {} with {} health", id, params.player_health);
    LevelState {
        id,
        variant: LevelVariant::for_level(id, &params.config),
        config: params.config.clone(),
        player: Player::new(params.player_health),
        enemy_units: Vec::new(),
        player_projectiles: Vec::new(),
        enemy_projectiles: Vec::new(),
        bombs: Vec::new(),
        view: LevelView::for_level(id, params.player_health),
        events: Vec::new(),
        status: LevelStatus::Playing,
        tick: 0,
    }
}

// ── Input intents ─────────────────────────────────────────────────────────────

pub fn move_player_up(state: &mut LevelState) {
    state.player.move_up();
}

pub fn move_player_down(state: &mut LevelState) {
    state.player.move_down();
}

pub fn move_player_left(state: &mut LevelState) {
    state.player.move_left();
}

pub fn move_player_right(state: &mut LevelState) {
    state.player.move_right();
}

pub fn stop_player(state: &mut LevelState) {
    state.player.stop();
}

/// Request a shot. Several requests between two ticks yield one projectile.
pub fn player_fire(state: &mut LevelState) {
    state.player.fire_requested = true;
}

// ── Per-tick pipeline ─────────────────────────────────────────────────────────

/// Advance the level by one tick. Once the level has ended every further
/// call returns `TickResult::Stopped` without touching the state.
pub fn tick(state: &mut LevelState, rng: &mut impl Rng) -> TickResult {
    if !state.is_running() {
        return TickResult::Stopped;
    }
    state.tick += 1;

    // ── 0. Shot requested since the last tick ────────────────────────────────
    apply_fire_intent(state);

    // ── 1. Spawn ─────────────────────────────────────────────────────────────
    spawn_enemy_units(state, rng);

    // ── 2. Move everything ───────────────────────────────────────────────────
    update_actors(state, rng);

    // ── 3. Enemies fire ──────────────────────────────────────────────────────
    let fresh_shots = generate_enemy_fire(state, rng);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    // This tick's shots sit out until they have travelled.
    handle_collisions(state, rng);
    state.enemy_projectiles.extend(fresh_shots);

    // ── 5. Position-triggered damage ─────────────────────────────────────────
    handle_penetrated_enemies(state);
    cull_stray_projectiles(state);

    // ── 6. Remove the dead, credit kills ─────────────────────────────────────
    remove_destroyed_actors(state);

    // ── 7. HUD ───────────────────────────────────────────────────────────────
    update_level_view(state);

    // ── 8. End condition ─────────────────────────────────────────────────────
    check_if_game_over(state)
}

pub fn apply_fire_intent(state: &mut LevelState) {
    if !state.player.fire_requested {
        return;
    }
    state.player.fire_requested = false;
    if !state.player.is_destroyed() {
        let shot = state.player.fire_projectile();
        state.player_projectiles.push(shot);
    }
}

/// Order: friendly, enemy, player projectiles, enemy projectiles, bombs.
pub fn update_actors(state: &mut LevelState, rng: &mut impl Rng) {
    state.player.update_actor();
    for enemy in &mut state.enemy_units {
        enemy.update_actor(rng, &mut state.events);
    }
    for projectile in &mut state.player_projectiles {
        projectile.update_actor();
    }
    for projectile in &mut state.enemy_projectiles {
        projectile.update_actor();
    }

    let (width, height) = (state.config.screen_width, state.config.screen_height);
    for bomb in &mut state.bombs {
        bomb.move_down();
        if bomb.has_fallen_past(height) {
            bomb.reset(rng, width);
        }
    }
}

/// Roll every enemy's fire gate. The shots are handed back rather than
/// stored: the caller adds them to `enemy_projectiles` once this tick's
/// collisions are done, and they first move next tick.
pub fn generate_enemy_fire(state: &mut LevelState, rng: &mut impl Rng) -> Vec<Projectile> {
    let mut shots = Vec::new();
    for enemy in &state.enemy_units {
        if let Some(projectile) = enemy.fire_projectile(rng) {
            if enemy.is_boss() {
                state.events.push(GameEvent::BossFireball);
            }
            shots.push(projectile);
        }
    }
    shots
}

/// Damage both sides of every overlapping pair.
fn collide<A: Destructible, B: Destructible>(first: &mut [A], second: &mut [B]) {
    for a in first.iter_mut() {
        for b in second.iter_mut() {
            if a.bounds().intersects(&b.bounds()) {
                a.take_damage();
                b.take_damage();
            }
        }
    }
}

/// One `PlayerHit` per point of health actually lost; hits landing on an
/// already destroyed player raise nothing.
pub fn handle_collisions(state: &mut LevelState, rng: &mut impl Rng) {
    let health_before = state.player.health;

    collide(
        std::slice::from_mut(&mut state.player),
        &mut state.enemy_units,
    );
    collide(&mut state.player_projectiles, &mut state.enemy_units);
    collide(
        &mut state.enemy_projectiles,
        std::slice::from_mut(&mut state.player),
    );

    let width = state.config.screen_width;
    for bomb in &mut state.bombs {
        if state.player.bounds().intersects(&bomb.bounds()) {
            state.player.take_damage();
            bomb.reset(rng, width);
        }
    }

    let player_hits = health_before.saturating_sub(state.player.health);
    for _ in 0..player_hits {
        state.events.push(GameEvent::PlayerHit);
    }
}

/// An enemy that has travelled further than the screen is wide has slipped
/// past the defence line and takes one point of damage.
pub fn handle_penetrated_enemies(state: &mut LevelState) {
    let width = state.config.screen_width;
    for enemy in &mut state.enemy_units {
        if enemy.body().translate_x.abs() > width {
            enemy.take_damage();
        }
    }
}

/// Projectiles a full screen width beyond either side edge can no longer
/// reach anything.
pub fn cull_stray_projectiles(state: &mut LevelState) {
    let width = state.config.screen_width;
    let projectiles = state
        .player_projectiles
        .iter_mut()
        .chain(state.enemy_projectiles.iter_mut());
    for projectile in projectiles {
        let x = projectile.body.x();
        if x < -width || x > 2.0 * width {
            projectile.destroy();
        }
    }
}

/// Excise destroyed entities. Each enemy removed here earns the player one
/// kill, exactly once. Returns the number of enemies removed.
///
/// The player is never removed: a destroyed player ends the level this tick.
pub fn remove_destroyed_actors(state: &mut LevelState) -> usize {
    let mut removed = 0;
    let mut boss_down = false;
    state.enemy_units.retain(|enemy| {
        if enemy.is_destroyed() {
            removed += 1;
            boss_down |= enemy.is_boss();
            false
        } else {
            true
        }
    });

    for _ in 0..removed {
        state.player.increment_kill_count();
        state.events.push(GameEvent::EnemyDestroyed);
    }
    if boss_down {
        state.variant.record_boss_defeat();
    }
    if removed > 0 {
        debug!("{} enemies down, kills now {}", removed, state.player.kills);
    }

    state.player_projectiles.retain(|p| !p.is_destroyed());
    state.enemy_projectiles.retain(|p| !p.is_destroyed());
    removed
}

pub fn update_level_view(state: &mut LevelState) {
    let boss = state.enemy_units.iter().find_map(EnemyUnit::as_boss);
    let defeated = state.variant.boss_defeated();
    state.view.sync(state.player.health, boss, defeated);
}

/// Apply the level's end predicate. Ending stops the level; the entities are
/// left as they were, so a session whose transition fails can resume it.
pub fn check_if_game_over(state: &mut LevelState) -> TickResult {
    let Some(status) = end_condition(state) else {
        return TickResult::Continue;
    };
    state.status = status;
    match status {
        LevelStatus::Playing => TickResult::Continue,
        LevelStatus::Lost => {
            info!("{}: player shot down after {} ticks", state.id, state.tick);
            state.view.show_game_over();
            state.events.push(GameEvent::GameOver);
            TickResult::Lose
        }
        LevelStatus::Won => {
            info!("{}: boss defeated, game won", state.id);
            state.view.show_win();
            state.events.push(GameEvent::Win);
            TickResult::Win
        }
        LevelStatus::Advanced(next) => {
            info!("{}: cleared, advancing to {}", state.id, next);
            state.events.push(GameEvent::LevelChange(next));
            TickResult::Transition(next)
        }
    }
}

// ── Collaborator views ────────────────────────────────────────────────────────

/// Every live entity, for the renderer.
pub fn sprites(state: &LevelState) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(
        1 + state.enemy_units.len()
            + state.player_projectiles.len()
            + state.enemy_projectiles.len()
            + state.bombs.len(),
    );
    if !state.player.is_destroyed() {
        sprites.push(state.player.sprite());
    }
    sprites.extend(state.enemy_units.iter().map(EnemyUnit::sprite));
    sprites.extend(state.player_projectiles.iter().map(|p| p.sprite()));
    sprites.extend(state.enemy_projectiles.iter().map(|p| p.sprite()));
    sprites.extend(state.bombs.iter().map(|b| b.sprite()));
    sprites
}

/// Hand the pending events to the caller.
pub fn drain_events(state: &mut LevelState) -> Vec<GameEvent> {
    std::mem::take(&mut state.events)
}
