mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sky_battle::compute::{
    move_player_down, move_player_left, move_player_right, move_player_up, player_fire,
    stop_player,
};
use sky_battle::config::GameConfig;
use sky_battle::events::GameEvent;
use sky_battle::levels::{LevelId, LevelRegistry};
use sky_battle::session::{Session, SessionStatus};

#[derive(Parser)]
#[command(name = "sky_battle")]
#[command(about = "Side-scrolling arcade shooter in the terminal")]
struct Args {
    /// RON config file overriding the default tunables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random generator (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level to start at: 1, 2, 3 or level-one / level-two / level-three
    #[arg(short, long, default_value = "1")]
    level: String,

    /// Write logs here; without it logging stays off unless RUST_LOG is set
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Held-key constants ────────────────────────────────────────────────────────

/// Min frames between shots while Space is held.
const SHOOT_COOLDOWN: u32 = 4;

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never report key releases.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const FIRE_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

// ── Logging & config ──────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        // stderr would scribble over the alternate screen
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.init();
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("could not use config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let lines: &[(&str, Color)] = &[
        ("✈  SKY  BATTLE  ✈", Color::Cyan),
        ("", Color::White),
        ("Clear the skies, beat the boss twice.", Color::White),
        ("", Color::White),
        ("[ENTER] Start game", Color::Green),
        ("[Q]     Quit", Color::DarkGrey),
    ];
    let top = cy.saturating_sub(lines.len() as u16 / 2 + 1);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            top + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` to quit the program, `false` to go back to the menu.
///
/// Input is folded into intents once per frame: every direction key seen
/// within `HOLD_WINDOW` frames is considered held, and the player's velocity
/// intent is rebuilt from that set before the tick runs. Keys leave the set
/// on release (terminals with keyboard enhancement) or by expiring.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let frame_period = Duration::from_millis(session.config().tick_millis);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut last_cue: Option<GameEvent> = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain pending input ───────────────────────────────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true)
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => session.toggle_pause(),
                        KeyCode::Enter if session.status() != SessionStatus::Playing => {
                            return Ok(false)
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Fold held keys into intents ───────────────────────────────────────
        if session.status() == SessionStatus::Playing && !session.is_paused() {
            let level = session.level_mut();
            stop_player(level);
            if is_held(&key_frame, &UP_KEYS, frame) {
                move_player_up(level);
            } else if is_held(&key_frame, &DOWN_KEYS, frame) {
                move_player_down(level);
            }
            if is_held(&key_frame, &LEFT_KEYS, frame) {
                move_player_left(level);
            } else if is_held(&key_frame, &RIGHT_KEYS, frame) {
                move_player_right(level);
            }
            if shoot_cooldown == 0 && is_held(&key_frame, &FIRE_KEYS, frame) {
                player_fire(level);
                shoot_cooldown = SHOOT_COOLDOWN;
            }
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        // ── Tick ──────────────────────────────────────────────────────────────
        if let Err(err) = session.tick() {
            error!("Level transition failed: {}", err);
        }
        if let Some(event) = session.drain_events().into_iter().last() {
            last_cue = Some(event);
        }

        display::render(out, session, last_cue)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            thread::sleep(frame_period - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    let config = load_config(&args)?;
    let start_level: LevelId = args.level.parse().context("bad --level")?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without the kitty protocol fall
    // back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, start_level);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    start_level: LevelId,
) -> Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut session =
                    Session::start_at(config.clone(), LevelRegistry::default(), rng, start_level)
                        .context("failed to start session")?;
                info!("Session started at {}", start_level);

                let quit = game_loop(out, &mut session, rx)?;
                info!(
                    "Session ended ({:?}) with {} kills",
                    session.status(),
                    session.total_kills()
                );
                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
