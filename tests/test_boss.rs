use sky_battle::actors::Destructible;
use sky_battle::boss::{Boss, BOSS_HEALTH, MAX_FRAMES_WITH_SHIELD};
use sky_battle::entities::ProjectileKind;
use sky_battle::events::GameEvent;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn calm_boss(rng: &mut StdRng) -> Boss {
    Boss::new(rng, 0.0, 0.0)
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn boss_starts_full_health_at_right_edge() {
    let mut rng = seeded_rng();
    let boss = calm_boss(&mut rng);
    assert_eq!(boss.health, BOSS_HEALTH);
    assert_relative_eq!(boss.body.x(), 1120.0);
    assert_relative_eq!(boss.body.y(), 450.0);
    assert!(!boss.is_shielded());
    assert_relative_eq!(boss.health_fraction(), 1.0);
}

#[test]
fn move_pattern_has_five_of_each_move() {
    let mut rng = seeded_rng();
    let boss = calm_boss(&mut rng);
    let pattern = boss.move_pattern();
    assert_eq!(pattern.len(), 15);
    assert_eq!(pattern.iter().filter(|&&m| m == 8.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == -8.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == 0.0).count(), 5);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn boss_stays_inside_vertical_band() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    for _ in 0..2000 {
        boss.update_position(&mut rng);
        let y = boss.body.y();
        assert!((-15.0..=475.0).contains(&y), "boss left the band: y = {y}");
        assert_relative_eq!(boss.body.x(), 1120.0);
    }
}

#[test]
fn reshuffles_keep_the_same_moves() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    for _ in 0..500 {
        boss.update_position(&mut rng);
    }
    let mut pattern = boss.move_pattern().to_vec();
    pattern.sort_by(|a, b| a.total_cmp(b));
    let mut expected = vec![-8.0; 5];
    expected.extend([0.0; 5]);
    expected.extend([8.0; 5]);
    assert_eq!(pattern, expected);
    assert!(boss.index_of_current_move() < 15);
}

#[test]
fn out_of_band_move_is_undone_and_pattern_restarts() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    let mut hit_edge = false;
    for _ in 0..200 {
        // Park the boss on the lower edge of the band
        boss.body.translate_y = 25.0;
        let next = boss.move_pattern()[boss.index_of_current_move()];
        boss.update_position(&mut rng);
        if next == 8.0 {
            assert_relative_eq!(boss.body.y(), 475.0);
            assert_eq!(boss.index_of_current_move(), 0);
            hit_edge = true;
            break;
        }
    }
    assert!(hit_edge, "never drew a downward move");
}

#[test]
fn moves_never_exceed_one_step() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    for _ in 0..300 {
        let before = boss.body.y();
        boss.update_position(&mut rng);
        let step = (boss.body.y() - before).abs();
        assert!(step == 0.0 || step == 8.0);
    }
}

// ── Shield ────────────────────────────────────────────────────────────────────

#[test]
fn shield_never_raised_at_zero_probability() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    for _ in 0..500 {
        assert_eq!(boss.update_shield(&mut rng), None);
    }
    assert!(!boss.is_shielded());
}

#[test]
fn shield_lasts_fifty_ticks() {
    let mut rng = seeded_rng();
    let mut boss = Boss::new(&mut rng, 0.0, 1.0);

    assert_eq!(
        boss.update_shield(&mut rng),
        Some(GameEvent::ShieldActivated)
    );
    assert!(boss.is_shielded());

    for tick in 1..MAX_FRAMES_WITH_SHIELD {
        assert_eq!(boss.update_shield(&mut rng), None);
        assert!(boss.is_shielded());
        assert_eq!(boss.frames_with_shield_activated(), tick);
    }

    assert_eq!(
        boss.update_shield(&mut rng),
        Some(GameEvent::ShieldDeactivated)
    );
    assert!(!boss.is_shielded());
    assert_eq!(boss.frames_with_shield_activated(), 0);

    // Probability 1.0 raises it straight back up
    assert_eq!(
        boss.update_shield(&mut rng),
        Some(GameEvent::ShieldActivated)
    );
}

#[test]
fn update_actor_reports_shield_events() {
    let mut rng = seeded_rng();
    let mut boss = Boss::new(&mut rng, 0.0, 1.0);
    let mut events = Vec::new();
    boss.update_actor(&mut rng, &mut events);
    assert_eq!(events, vec![GameEvent::ShieldActivated]);
}

#[test]
fn shield_absorbs_all_damage() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    boss.activate_shield();
    for _ in 0..100 {
        boss.take_damage();
    }
    assert_eq!(boss.health, BOSS_HEALTH);
    assert!(!boss.is_destroyed());
}

#[test]
fn unshielded_boss_dies_after_ten_hits() {
    let mut rng = seeded_rng();
    let mut boss = calm_boss(&mut rng);
    for _ in 0..3 {
        boss.take_damage();
    }
    assert_relative_eq!(boss.health_fraction(), 0.7);
    for _ in 0..7 {
        boss.take_damage();
    }
    assert_eq!(boss.health, 0);
    assert!(boss.is_destroyed());
}

// ── Fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fireball_gate() {
    let mut rng = seeded_rng();
    let quiet = calm_boss(&mut rng);
    for _ in 0..100 {
        assert!(quiet.fire_projectile(&mut rng).is_none());
    }

    let angry = Boss::new(&mut rng, 1.0, 0.0);
    let fireball = angry
        .fire_projectile(&mut rng)
        .expect("rate 1.0 always fires");
    assert_eq!(fireball.kind, ProjectileKind::Fireball);
    assert_relative_eq!(fireball.body.x(), 950.0);
    assert_relative_eq!(fireball.body.y(), 450.0 + 85.0);
}
