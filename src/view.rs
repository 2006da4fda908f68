//! HUD state a level keeps in step with the simulation: hearts, the boss
//! shield indicator and health gauge, and the end-of-level banner.

use crate::boss::Boss;
use crate::levels::LevelId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartDisplay {
    hearts: u32,
}

impl HeartDisplay {
    pub fn new(hearts: u32) -> Self {
        Self { hearts }
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn remove_heart(&mut self) {
        self.hearts = self.hearts.saturating_sub(1);
    }

    /// Drop hearts until no more than `remaining` are shown. Never adds any.
    pub fn remove_hearts(&mut self, remaining: u32) {
        while self.hearts > remaining {
            self.remove_heart();
        }
    }
}

/// Boss levels show a shield icon and a health bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BossGauge {
    /// 1.0 = full health.
    pub health_fraction: f64,
    pub shield_visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Win,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelView {
    pub hearts: HeartDisplay,
    pub boss_gauge: Option<BossGauge>,
    pub banner: Option<Banner>,
}

impl LevelView {
    /// Level one shows hearts only; the boss levels add the gauge.
    pub fn for_level(id: LevelId, hearts: u32) -> Self {
        let boss_gauge = match id {
            LevelId::One => None,
            LevelId::Two | LevelId::Three => Some(BossGauge {
                health_fraction: 1.0,
                shield_visible: false,
            }),
        };
        Self {
            hearts: HeartDisplay::new(hearts),
            boss_gauge,
            banner: None,
        }
    }

    /// Reconcile with the current simulation state. `boss` is the live boss,
    /// if one is on screen; `boss_defeated` empties the gauge once it is gone.
    pub fn sync(&mut self, player_health: u32, boss: Option<&Boss>, boss_defeated: bool) {
        self.hearts.remove_hearts(player_health);
        if let Some(gauge) = self.boss_gauge.as_mut() {
            match boss {
                Some(boss) => {
                    gauge.health_fraction = boss.health_fraction();
                    gauge.shield_visible = boss.is_shielded();
                }
                None if boss_defeated => {
                    gauge.health_fraction = 0.0;
                    gauge.shield_visible = false;
                }
                None => {}
            }
        }
    }

    pub fn show_win(&mut self) {
        self.banner = Some(Banner::Win);
    }

    pub fn show_game_over(&mut self) {
        self.banner = Some(Banner::GameOver);
    }
}
