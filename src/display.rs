/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only translates state
/// into terminal commands.
///
/// Screen layout: row 0 is the HUD, rows 1 and `height - 2` are the border,
/// the last row is the controls hint.  The playground (world origin) starts
/// at column 1, row 2.

use std::io::Write;
use std::time::Instant;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use plane_dodge::clock::format_time;
use plane_dodge::entities::{Entity, EntityKind, GameResult, Plane, SessionState, Viewport};
use plane_dodge::session::GameSession;

use crate::audio::Audio;

/// Columns / rows taken by the border, HUD and hint around the playground.
pub const ORIGIN_COL: u16 = 1;
pub const ORIGIN_ROW: u16 = 2;
const CHROME_WIDTH: u16 = 2;
const CHROME_HEIGHT: u16 = 4;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_FUEL: Color = Color::Green;
const C_HUD_FUEL_LOW: Color = Color::Red;
const C_HUD_TIME: Color = Color::White;
const C_HUD_PREVIOUS: Color = Color::DarkGrey;
const C_PLANE: Color = Color::White;
const C_STAR: Color = Color::Yellow;
const C_PARACHUTE: Color = Color::Green;
const C_BIRD: Color = Color::Red;
const C_CLOUD: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const LOW_FUEL: u32 = 3;

/// Playground size for a terminal of `width` × `height` cells.
pub fn viewport_for(width: u16, height: u16) -> Viewport {
    Viewport {
        width: width.saturating_sub(CHROME_WIDTH) as f32,
        height: height.saturating_sub(CHROME_HEIGHT) as f32,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    audio: &Audio,
    now: Instant,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let viewport = session.viewport();

    draw_border(out, width, height)?;
    draw_hud(out, session, audio, now, width)?;

    if let Some(field) = session.playfield() {
        // Clouds first so everything else is drawn over them.
        for kind in [EntityKind::Cloud, EntityKind::Star, EntityKind::Parachute, EntityKind::Bird] {
            if let Some(pool) = field.pool(kind) {
                for entity in &pool.entities {
                    draw_entity(out, entity, &viewport)?;
                }
            }
        }
        draw_plane(out, &field.plane, &viewport)?;
    }

    draw_controls_hint(out, height)?;

    match session.state() {
        SessionState::Idle => draw_start_screen(out, session, width, height)?,
        SessionState::Paused => draw_pause_overlay(out, width, height)?,
        SessionState::Over => draw_results(out, session, width, height)?,
        SessionState::Running => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in ORIGIN_ROW..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    session: &GameSession,
    audio: &Audio,
    now: Instant,
    width: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>4}  ", session.score())))?;

    let fuel_color = if session.fuel() <= LOW_FUEL {
        C_HUD_FUEL_LOW
    } else {
        C_HUD_FUEL
    };
    out.queue(style::SetForegroundColor(fuel_color))?;
    out.queue(Print(format!("Fuel:{:>3}  ", session.fuel())))?;

    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(format!("Time: {}", format_time(session.elapsed(now)))))?;

    // Previous run + sound — right side
    let previous = session
        .previous_result()
        .map(|r| format!("Prev: {} / {}  ", r.score, format_time(r.time)))
        .unwrap_or_default();
    let sound = if audio.is_muted() {
        "♪ off"
    } else if audio.is_music_playing() {
        "♪ ♫"
    } else {
        "♪ on"
    };
    let right_str = format!("{}{}", previous, sound);
    let rx = width.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_PREVIOUS))?;
    out.queue(Print(&right_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Print `text` starting at world cell (`x`, `y`), skipping every cell that
/// falls outside the playground.
fn put<W: Write>(
    out: &mut W,
    x: f32,
    y: f32,
    text: &str,
    viewport: &Viewport,
) -> std::io::Result<()> {
    let row = y.floor();
    if row < 0.0 || row >= viewport.height {
        return Ok(());
    }
    let start = x.floor();
    for (i, ch) in text.chars().enumerate() {
        let col = start + i as f32;
        if col < 0.0 || col >= viewport.width || ch == ' ' {
            continue;
        }
        out.queue(cursor::MoveTo(
            ORIGIN_COL + col as u16,
            ORIGIN_ROW + row as u16,
        ))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// Sprites match the per-kind sizes in `plane_dodge::pool::size_for`.
const SPRITE_STAR: &[&str] = &["★"];
const SPRITE_PARACHUTE: &[&str] = &["╭┬╮", " ▼ "];
const SPRITE_BIRD: &[&str] = &["<v~"];
const SPRITE_CLOUD: &[&str] = &[" .--.  ", "(____)~"];

fn sprite(kind: EntityKind) -> (&'static [&'static str], Color) {
    match kind {
        EntityKind::Star => (SPRITE_STAR, C_STAR),
        EntityKind::Parachute => (SPRITE_PARACHUTE, C_PARACHUTE),
        EntityKind::Bird => (SPRITE_BIRD, C_BIRD),
        EntityKind::Cloud => (SPRITE_CLOUD, C_CLOUD),
    }
}

fn draw_entity<W: Write>(out: &mut W, entity: &Entity, viewport: &Viewport) -> std::io::Result<()> {
    let (rows, color) = sprite(entity.kind);
    out.queue(style::SetForegroundColor(color))?;
    for (dy, line) in rows.iter().enumerate() {
        put(out, entity.position.x, entity.position.y + dy as f32, line, viewport)?;
    }
    Ok(())
}

fn draw_plane<W: Write>(out: &mut W, plane: &Plane, viewport: &Viewport) -> std::io::Result<()> {
    // Sprite (2 rows, 5 cols), nose to the right:
    //   |\__
    //   =[==>
    out.queue(style::SetForegroundColor(C_PLANE))?;
    put(out, plane.position.x, plane.position.y, "|\\__ ", viewport)?;
    put(out, plane.position.x, plane.position.y + 1.0, "=[==>", viewport)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "WASD / ←↑↓→ : Fly   SPACE : Pause   M : Sound   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Print centred lines starting at `start_row`.
fn draw_centred<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    start_row: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_start_screen<W: Write>(
    out: &mut W,
    session: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let fuel = session.settings().initial_fuel;
    let lines = vec![
        ("✈  PLANE  DODGE  ✈".to_string(), Color::Cyan),
        (String::new(), Color::White),
        ("★ star      +1 score".to_string(), C_STAR),
        ("╭┬╮ parachute  +fuel".to_string(), C_PARACHUTE),
        ("<v~ bird      game over".to_string(), C_BIRD),
        (String::new(), Color::White),
        (format!("You start with {} fuel; one burns every second.", fuel), Color::DarkGrey),
        (String::new(), Color::White),
        ("ENTER - Start   Q - Quit".to_string(), Color::White),
    ];
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    draw_centred(out, &lines, width, start_row)
}

fn draw_pause_overlay<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let lines = vec![
        ("╔════════════════════╗".to_string(), Color::Yellow),
        ("║       PAUSED       ║".to_string(), Color::Yellow),
        ("╚════════════════════╝".to_string(), Color::Yellow),
        ("SPACE - Resume".to_string(), Color::White),
    ];
    let start_row = (height / 2).saturating_sub(2);
    draw_centred(out, &lines, width, start_row)
}

fn result_line(label: &str, result: Option<GameResult>) -> String {
    match result {
        Some(r) => format!("{} {:>5}   {}", label, r.score, format_time(r.time)),
        None => format!("{}    --   --:--", label),
    }
}

fn draw_results<W: Write>(
    out: &mut W,
    session: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let current = session.current_result();
    let previous = session.previous_result();

    let improved = match (current, previous) {
        (Some(c), Some(p)) => c.score > p.score,
        _ => false,
    };
    let current_color = if improved { Color::Yellow } else { Color::White };

    let lines = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        ("           Score   Time".to_string(), Color::DarkGrey),
        (result_line("This run:", current), current_color),
        (result_line("Previous:", previous), Color::DarkGrey),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    draw_centred(out, &lines, width, start_row)
}
