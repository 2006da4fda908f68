//! Signals the core raises for its collaborators.

use crate::levels::LevelId;

/// Discrete cues for the audio / presentation side. The core never waits on
/// whoever consumes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    EnemyDestroyed,
    PlayerHit,
    BossFireball,
    ShieldActivated,
    ShieldDeactivated,
    LevelChange(LevelId),
    GameOver,
    Win,
}

/// Outcome of one call to `compute::tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    /// The level is over and the session should load the named level.
    Transition(LevelId),
    Win,
    Lose,
    /// The level had already ended; nothing ran.
    Stopped,
}
