mod audio;
mod display;
mod input;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use plane_dodge::config::Settings;
use plane_dodge::entities::SessionState;
use plane_dodge::session::{GameEvent, GameSession};

use crate::audio::Audio;
use crate::input::HeldKeys;

#[derive(Parser, Debug)]
#[command(name = "plane_dodge")]
#[command(about = "Fly the plane, dodge the birds, collect stars and parachutes")]
struct Args {
    /// Frames per second of the update loop
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Fuel at the start of each run (one unit burns per second)
    #[arg(long, default_value_t = Settings::default().initial_fuel)]
    fuel: u32,

    /// Fuel added by each parachute
    #[arg(long, default_value_t = Settings::default().fuel_step)]
    fuel_step: u32,

    /// Plane movement in cells per frame
    #[arg(long, default_value_t = Settings::default().plane_speed)]
    plane_speed: f32,

    /// Seed for reproducible spawn positions
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filter with RUST_LOG); no logging otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with sound off
    #[arg(long)]
    mute: bool,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the renderer, so logs only go to a file.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Movement keys feed a [`HeldKeys`] table and each frame the keys still held
/// become the plane's intent flags.  One-shot keys (start, pause, restart,
/// mute, quit) act on press only.
///
/// `keyboard_enhanced` says whether the terminal reports `Release` events
/// (Ghostty, kitty, etc.).  Classic terminals only send `Press`, with OS
/// key-repeat showing up as repeated presses.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    audio: &mut Audio,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_time: Duration,
    keyboard_enhanced: bool,
) -> Result<()> {
    let mut held = HeldKeys::new(keyboard_enhanced, frame_time);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut events: Vec<GameEvent> = Vec::new();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => (code, kind, modifiers),
                Event::Resize(width, height) => {
                    session.resize(display::viewport_for(width, height));
                    continue;
                }
                _ => continue,
            };
            match kind {
                KeyEventKind::Press => {
                    held.press(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Enter => {
                            events.extend(session.start(frame_start, rng));
                        }
                        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                            events.extend(session.toggle_pause(frame_start));
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            events.extend(session.restart(frame_start, rng));
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => audio.toggle_mute(),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => held.repeat(code, frame),
                KeyEventKind::Release => held.release(&code),
            }
        }

        session.set_directions(held.directions(frame));

        if session.state() == SessionState::Running {
            events.extend(session.update(frame_start, rng));
        }

        for event in &events {
            audio.handle(out, event)?;
        }

        display::render(out, session, audio, frame_start)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &args, keyboard_enhanced);

    // Always restore the terminal
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
    args: &Args,
    keyboard_enhanced: bool,
) -> Result<()> {
    let (width, height) = terminal::size().context("failed to read terminal size")?;
    let settings = Settings {
        plane_speed: args.plane_speed,
        initial_fuel: args.fuel,
        fuel_step: args.fuel_step,
        viewport: display::viewport_for(width, height),
    };
    info!(?settings, seed = ?args.seed, keyboard_enhanced, "starting");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = Duration::from_secs(1) / args.fps.max(1);

    let mut session = GameSession::new(settings);
    let mut audio = Audio::new(args.mute);
    game_loop(
        out,
        &mut session,
        &mut audio,
        rx,
        &mut rng,
        frame_time,
        keyboard_enhanced,
    )
}
