use sky_battle::compute::{init_level, tick};
use sky_battle::config::GameConfig;
use sky_battle::entities::{EnemyUnit, LevelStatus};
use sky_battle::error::GameError;
use sky_battle::levels::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_config() -> GameConfig {
    GameConfig {
        enemy_fire_rate: 0.0,
        boss_fire_rate: 0.0,
        boss_shield_probability: 0.0,
        ..GameConfig::default()
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── LevelId ───────────────────────────────────────────────────────────────────

#[test]
fn level_id_parses_every_spelling() {
    for key in ["1", "one", "level-one", " Level-One "] {
        assert_eq!(key.parse::<LevelId>().ok(), Some(LevelId::One), "{key}");
    }
    for key in ["2", "TWO", "level-two"] {
        assert_eq!(key.parse::<LevelId>().ok(), Some(LevelId::Two), "{key}");
    }
    for key in ["3", "three", "level-three"] {
        assert_eq!(key.parse::<LevelId>().ok(), Some(LevelId::Three), "{key}");
    }
}

#[test]
fn level_id_rejects_unknown_key() {
    let err = "level-four".parse::<LevelId>().unwrap_err();
    assert!(matches!(err, GameError::UnknownLevel(ref key) if key == "level-four"));
}

#[test]
fn level_id_names_and_backgrounds() {
    assert_eq!(LevelId::One.to_string(), "level-one");
    assert_eq!(LevelId::Three.name(), "level-three");
    assert_eq!(LevelId::Two.background(), "background2");
}

// ── Variant state ─────────────────────────────────────────────────────────────

#[test]
fn level_one_variant_is_primed_to_spawn() {
    let config = quiet_config();
    assert_eq!(
        LevelVariant::for_level(LevelId::One, &config),
        LevelVariant::One {
            ticks_since_spawn: config.enemy_spawn_interval_ticks
        }
    );
}

#[test]
fn boss_defeat_only_recorded_on_boss_levels() {
    let config = quiet_config();
    let mut one = LevelVariant::for_level(LevelId::One, &config);
    one.record_boss_defeat();
    assert!(!one.boss_defeated());

    let mut three = LevelVariant::for_level(LevelId::Three, &config);
    assert!(!three.boss_defeated());
    three.record_boss_defeat();
    assert!(three.boss_defeated());
}

// ── Spawn policy ──────────────────────────────────────────────────────────────

#[test]
fn boss_spawns_once() {
    let mut s = init_level(LevelId::Two, &LevelParams::fresh(&quiet_config()));
    let mut rng = seeded_rng();
    spawn_enemy_units(&mut s, &mut rng);
    assert_eq!(s.enemy_units.len(), 1);
    assert!(matches!(s.enemy_units[0], EnemyUnit::Boss(_)));

    spawn_enemy_units(&mut s, &mut rng);
    assert_eq!(s.enemy_units.len(), 1);

    // Even with the screen cleared, no second boss appears
    s.enemy_units.clear();
    spawn_enemy_units(&mut s, &mut rng);
    assert!(s.enemy_units.is_empty());
}

#[test]
fn level_three_drops_first_bomb_on_interval() {
    let mut s = init_level(LevelId::Three, &LevelParams::fresh(&quiet_config()));
    let mut rng = seeded_rng();
    for _ in 0..39 {
        tick(&mut s, &mut rng);
    }
    assert!(s.bombs.is_empty());
    tick(&mut s, &mut rng);
    assert_eq!(s.bombs.len(), 1);
    assert!(s.enemy_units[0].is_boss());
}

#[test]
fn bombs_capped_at_max() {
    let config = GameConfig {
        bomb_spawn_interval_ticks: 1,
        ..quiet_config()
    };
    let mut s = init_level(LevelId::Three, &LevelParams::fresh(&config));
    let mut rng = seeded_rng();
    for _ in 0..5 {
        tick(&mut s, &mut rng);
    }
    assert_eq!(s.bombs.len(), config.max_bombs);
}

#[test]
fn level_two_has_no_bombs() {
    let mut s = init_level(LevelId::Two, &LevelParams::fresh(&quiet_config()));
    let mut rng = seeded_rng();
    for _ in 0..100 {
        tick(&mut s, &mut rng);
    }
    assert!(s.bombs.is_empty());
}

// ── End predicate ─────────────────────────────────────────────────────────────

#[test]
fn end_condition_per_level() {
    let config = quiet_config();
    let params = LevelParams::fresh(&config);

    let mut one = init_level(LevelId::One, &params);
    assert_eq!(end_condition(&one), None);
    one.player.kills = config.kills_to_advance;
    assert_eq!(
        end_condition(&one),
        Some(LevelStatus::Advanced(LevelId::Two))
    );

    let mut two = init_level(LevelId::Two, &params);
    assert_eq!(end_condition(&two), None);
    two.variant.record_boss_defeat();
    assert_eq!(
        end_condition(&two),
        Some(LevelStatus::Advanced(LevelId::Three))
    );

    let mut three = init_level(LevelId::Three, &params);
    three.variant.record_boss_defeat();
    assert_eq!(end_condition(&three), Some(LevelStatus::Won));
}

#[test]
fn lost_takes_precedence() {
    let params = LevelParams::fresh(&quiet_config());
    let mut three = init_level(LevelId::Three, &params);
    three.variant.record_boss_defeat();
    three.player.body.destroyed = true;
    assert_eq!(end_condition(&three), Some(LevelStatus::Lost));
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn default_registry_knows_every_level() {
    let registry = LevelRegistry::default();
    let params = LevelParams::fresh(&quiet_config());
    for id in [LevelId::One, LevelId::Two, LevelId::Three] {
        assert!(registry.contains(id));
        let level = registry.build(id, &params).expect("registered");
        assert_eq!(level.id, id);
    }
}

#[test]
fn build_named_resolves_string_keys() {
    let registry = LevelRegistry::default();
    let params = LevelParams::fresh(&quiet_config());
    let level = registry.build_named("level-two", &params).expect("known key");
    assert_eq!(level.id, LevelId::Two);
    assert!(registry.build_named("bonus", &params).is_err());
}

#[test]
fn empty_registry_reports_unknown_level() {
    let registry = LevelRegistry::empty();
    let params = LevelParams::fresh(&quiet_config());
    assert!(!registry.contains(LevelId::One));
    let err = registry.build(LevelId::One, &params).unwrap_err();
    assert!(matches!(err, GameError::UnknownLevel(_)));
}

#[test]
fn registered_constructor_is_used() {
    let mut registry = LevelRegistry::empty();
    registry.register(LevelId::Two, |params| {
        let mut level = init_level(LevelId::Two, params);
        level.player.health = 1;
        level
    });
    let level = registry
        .build(LevelId::Two, &LevelParams::fresh(&quiet_config()))
        .expect("registered");
    assert_eq!(level.player.health, 1);
}
