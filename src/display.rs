//! Rendering layer: all terminal I/O lives here.
//!
//! The simulation works in world units (a 1300x750 stage by default); this
//! module scales them onto whatever terminal it is given. No game logic is
//! performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use rand::Rng;
use sky_battle::compute::sprites;
use sky_battle::entities::{Sprite, Visual};
use sky_battle::events::GameEvent;
use sky_battle::levels::LevelId;
use sky_battle::session::Session;
use sky_battle::view::{Banner, BossGauge};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_KILLS: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_SHIELD: Color = Color::Cyan;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_FIREBALL: Color = Color::DarkYellow;
const C_BOMB: Color = Color::Grey;
const C_HINT: Color = Color::DarkGrey;

const BOSS_BAR_WIDTH: usize = 20;

fn border_color(level: LevelId) -> Color {
    match level {
        LevelId::One => Color::DarkBlue,
        LevelId::Two => Color::DarkMagenta,
        LevelId::Three => Color::DarkRed,
    }
}

/// Short caption for the most recent cue.
fn cue_text(event: GameEvent) -> String {
    match event {
        GameEvent::EnemyDestroyed => "boom!".to_string(),
        GameEvent::PlayerHit => "hit!".to_string(),
        GameEvent::BossFireball => "fireball!".to_string(),
        GameEvent::ShieldActivated => "shield up".to_string(),
        GameEvent::ShieldDeactivated => "shield down".to_string(),
        GameEvent::LevelChange(next) => format!("entering {next}"),
        GameEvent::GameOver => "game over".to_string(),
        GameEvent::Win => "victory".to_string(),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    last_cue: Option<GameEvent>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let level = session.level();

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height, border_color(level.id))?;
    draw_hud(out, session, width, last_cue)?;

    let world = (level.screen_width(), level.screen_height());
    for sprite in sprites(level) {
        draw_sprite(out, &sprite, world, width, height)?;
    }

    draw_controls_hint(out, height)?;

    if let Some(banner) = level.view.banner {
        draw_banner(out, banner, session.total_kills(), width, height)?;
    } else if session.is_paused() {
        draw_centered(out, &[("── PAUSED ──", Color::White)], width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16, color: Color) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(color))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    width: u16,
    last_cue: Option<GameEvent>,
) -> std::io::Result<()> {
    let level = session.level();

    // Hearts and kills, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print("♥".repeat(level.view.hearts.hearts() as usize)))?;
    out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
    out.queue(Print(format!(
        "  Kills:{:>3}  Total:{:>3}",
        level.player.kills,
        session.total_kills()
    )))?;
    if let Some(cue) = last_cue {
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("  {}", cue_text(cue))))?;
    }

    // Level name, centre
    let name = format!("[ {} ]", level.id.name().to_uppercase());
    let lx = (width / 2).saturating_sub(name.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(border_color(level.id)))?;
    out.queue(Print(&name))?;

    // Boss gauge, right
    if let Some(gauge) = &level.view.boss_gauge {
        let text = boss_gauge_text(gauge);
        let rx = width.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 0))?;
        out.queue(style::SetForegroundColor(if gauge.shield_visible {
            C_SHIELD
        } else {
            C_BOSS
        }))?;
        out.queue(Print(&text))?;
    }
    Ok(())
}

fn boss_gauge_text(gauge: &BossGauge) -> String {
    let filled = (gauge.health_fraction.clamp(0.0, 1.0) * BOSS_BAR_WIDTH as f64).round() as usize;
    let shield = if gauge.shield_visible { "◆ " } else { "  " };
    format!(
        "{}BOSS [{}{}]",
        shield,
        "█".repeat(filled),
        "·".repeat(BOSS_BAR_WIDTH - filled)
    )
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn glyph(visual: Visual) -> (&'static str, Color) {
    match visual {
        Visual::Player => ("╞═>", C_PLAYER),
        Visual::EnemyPlane => ("<═╡", C_ENEMY),
        Visual::Boss { shielded: false } => ("◀██▶", C_BOSS),
        Visual::Boss { shielded: true } => ("[◀██▶]", C_SHIELD),
        Visual::PlayerShot => ("-", C_SHOT_PLAYER),
        Visual::EnemyShot => ("•", C_SHOT_ENEMY),
        Visual::Fireball => ("*", C_FIREBALL),
        Visual::Bomb => ("●", C_BOMB),
    }
}

/// Draw a sprite at the centre of its world-space bounds, if it is on screen.
fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    (world_w, world_h): (f64, f64),
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let inner_w = width.saturating_sub(2) as f64;
    let inner_h = height.saturating_sub(4) as f64;
    let cx = (sprite.bounds.min_x + sprite.bounds.max_x) / 2.0;
    let cy = (sprite.bounds.min_y + sprite.bounds.max_y) / 2.0;
    if cx < 0.0 || cy < 0.0 || cx >= world_w || cy >= world_h {
        return Ok(());
    }

    let (text, color) = glyph(sprite.visual);
    let len = text.chars().count() as f64;
    let col = (1.0 + cx / world_w * inner_w - len / 2.0).max(1.0);
    let row = 2.0 + cy / world_h * inner_h;
    if col + len > width.saturating_sub(1) as f64 {
        return Ok(());
    }

    out.queue(cursor::MoveTo(col as u16, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "↑ ↓ ← → / W A S D : Move   SPACE : Fire   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    banner: Banner,
    total_kills: u32,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let kills_line = format!("Total kills: {:>4}", total_kills);
    let (title, color) = match banner {
        Banner::Win => ("║     YOU  WIN!      ║", Color::Green),
        Banner::GameOver => ("║    GAME  OVER      ║", Color::Red),
    };
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", color),
        (title, color),
        ("╚════════════════════╝", color),
        (kills_line.as_str(), Color::Yellow),
        ("ENTER - Menu  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)
}

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
