use sky_battle::compute::init_level;
use sky_battle::config::GameConfig;
use sky_battle::entities::{EnemyPlane, EnemyUnit, LevelState, Projectile, ProjectileKind};
use sky_battle::error::GameError;
use sky_battle::events::{GameEvent, TickResult};
use sky_battle::levels::{LevelId, LevelRegistry, LevelVariant};
use sky_battle::session::{Session, SessionStatus};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_config() -> GameConfig {
    GameConfig {
        enemy_fire_rate: 0.0,
        boss_fire_rate: 0.0,
        boss_shield_probability: 0.0,
        kills_to_advance: 1,
        ..GameConfig::default()
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn new_session(config: GameConfig) -> Session<StdRng> {
    Session::new(config, LevelRegistry::default(), seeded_rng()).expect("valid config")
}

/// Line up a plane and a player shot so the next tick scores a kill.
fn set_up_kill(level: &mut LevelState) {
    level.variant = LevelVariant::One {
        ticks_since_spawn: 0,
    };
    level
        .enemy_units
        .push(EnemyUnit::Plane(EnemyPlane::new(600.0, 100.0, 0.0)));
    level
        .player_projectiles
        .push(Projectile::new(ProjectileKind::Player, 600.0, 100.0));
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn session_starts_at_level_one() {
    let session = new_session(quiet_config());
    assert_eq!(session.level().id, LevelId::One);
    assert_eq!(session.status(), SessionStatus::Playing);
    assert!(!session.is_paused());
    assert_eq!(session.total_kills(), 0);
}

#[test]
fn start_at_any_registered_level() {
    let session = Session::start_at(
        quiet_config(),
        LevelRegistry::default(),
        seeded_rng(),
        LevelId::Three,
    )
    .expect("registered");
    assert_eq!(session.level().id, LevelId::Three);
}

#[test]
fn invalid_config_is_rejected() {
    let config = GameConfig {
        boss_fire_rate: 1.5,
        ..GameConfig::default()
    };
    let err = Session::new(config, LevelRegistry::default(), seeded_rng())
        .err()
        .expect("rate above 1 is invalid");
    assert!(matches!(err, GameError::Config(_)));
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn paused_session_does_not_tick() {
    let mut session = new_session(quiet_config());
    session.pause();
    assert!(session.is_paused());
    for _ in 0..5 {
        assert_eq!(session.tick().expect("tick"), TickResult::Stopped);
    }
    assert_eq!(session.level().tick, 0);

    session.resume();
    assert_eq!(session.tick().expect("tick"), TickResult::Continue);
    assert_eq!(session.level().tick, 1);
}

#[test]
fn toggle_pause_flips() {
    let mut session = new_session(quiet_config());
    session.toggle_pause();
    assert!(session.is_paused());
    session.toggle_pause();
    assert!(!session.is_paused());
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn clearing_level_one_loads_level_two() {
    let mut session = new_session(quiet_config());
    set_up_kill(session.level_mut());

    assert_eq!(
        session.tick().expect("tick"),
        TickResult::Transition(LevelId::Two)
    );
    assert_eq!(session.level().id, LevelId::Two);
    assert_eq!(session.level().player.kills, 0);
    assert_eq!(session.total_kills(), 1);
    assert_eq!(session.status(), SessionStatus::Playing);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::EnemyDestroyed));
    assert!(events.contains(&GameEvent::LevelChange(LevelId::Two)));
    assert!(session.drain_events().is_empty());
}

#[test]
fn health_carries_over_by_default() {
    let mut session = new_session(quiet_config());
    session.level_mut().player.health = 3;
    set_up_kill(session.level_mut());
    session.tick().expect("tick");
    assert_eq!(session.level().player.health, 3);
    assert_eq!(session.level().view.hearts.hearts(), 3);
}

#[test]
fn health_resets_without_carry_over() {
    let config = GameConfig {
        carry_over_health: false,
        ..quiet_config()
    };
    let mut session = new_session(config);
    session.level_mut().player.health = 3;
    set_up_kill(session.level_mut());
    session.tick().expect("tick");
    assert_eq!(session.level().player.health, 5);
}

#[test]
fn go_to_level_directly() {
    let mut session = new_session(quiet_config());
    session.go_to_level(LevelId::Three).expect("registered");
    assert_eq!(session.level().id, LevelId::Three);
}

#[test]
fn missing_level_keeps_current_one_running() {
    let mut registry = LevelRegistry::empty();
    registry.register(LevelId::One, |params| init_level(LevelId::One, params));
    let mut session =
        Session::new(quiet_config(), registry, seeded_rng()).expect("level one registered");
    set_up_kill(session.level_mut());
    session
        .level_mut()
        .enemy_units
        .push(EnemyUnit::Plane(EnemyPlane::new(900.0, 0.0, 0.0)));

    let err = session.tick().unwrap_err();
    assert!(matches!(err, GameError::UnknownLevel(_)));
    assert_eq!(session.level().id, LevelId::One);
    assert!(session.level().is_running());
    assert_eq!(session.level().enemy_units.len(), 1);
    assert_eq!(session.status(), SessionStatus::Playing);

    // The level keeps simulating while the transition keeps failing
    assert!(session.tick().is_err());
    assert_eq!(session.level().tick, 2);

    // It can still be lost, which hands control back to the front end
    let level = session.level_mut();
    level.player.health = 1;
    level
        .enemy_units
        .push(EnemyUnit::Plane(EnemyPlane::new(100.0, 320.0, 0.0)));
    assert_eq!(session.tick().expect("tick"), TickResult::Lose);
    assert_eq!(session.status(), SessionStatus::Lost);
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

#[test]
fn losing_ends_the_session() {
    let mut session = new_session(quiet_config());
    let level = session.level_mut();
    level.variant = LevelVariant::One {
        ticks_since_spawn: 0,
    };
    level.player.health = 1;
    level
        .enemy_units
        .push(EnemyUnit::Plane(EnemyPlane::new(100.0, 320.0, 0.0)));

    assert_eq!(session.tick().expect("tick"), TickResult::Lose);
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.tick().expect("tick"), TickResult::Stopped);
    assert!(session.drain_events().contains(&GameEvent::GameOver));
}

#[test]
fn beating_level_three_wins() {
    let mut session = Session::start_at(
        quiet_config(),
        LevelRegistry::default(),
        seeded_rng(),
        LevelId::Three,
    )
    .expect("registered");
    session.tick().expect("tick");
    if let Some(EnemyUnit::Boss(boss)) = session.level_mut().enemy_units.first_mut() {
        boss.health = 1;
    }
    session
        .level_mut()
        .player_projectiles
        .push(Projectile::new(ProjectileKind::Player, 1100.0, 500.0));

    assert_eq!(session.tick().expect("tick"), TickResult::Win);
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.total_kills(), 1);
}
