//! Block Rush terminal front-end
//!
//! Presentation only: name entry, playfield rendering, mouse routing and the
//! frame clock. Every game rule lives in `block_rush::sim`; this binary just
//! feeds it inputs and paints whatever the event stream says.

use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    execute, queue,
    style::{self, Color},
    terminal,
};
use glam::Vec2;

use block_rush::consts::*;
use block_rush::sim::{GameEvent, GameState, PointerButton, tick};
use block_rush::tuning::GameTuning;

// Playfield units per terminal cell; cells are roughly twice as tall as wide
const UNITS_PER_COL: f32 = 10.0;
const UNITS_PER_ROW: f32 = 20.0;
/// Top row is the score/lives HUD
const HUD_ROWS: u16 = 1;

/// Presentation-side copy of one live block, built from `BlockSpawned`.
struct BlockView {
    id: u32,
    required: PointerButton,
    pos: Vec2,
    spawned: Instant,
    lifetime_ms: u32,
}

impl BlockView {
    /// Cell rectangle (col, row, w, h) this block covers
    fn rect(&self) -> (u16, u16, u16, u16) {
        let col = (self.pos.x / UNITS_PER_COL) as u16;
        let row = HUD_ROWS + (self.pos.y / UNITS_PER_ROW) as u16;
        let w = (BLOCK_WIDTH / UNITS_PER_COL).ceil() as u16;
        let h = (BLOCK_HEIGHT / UNITS_PER_ROW).ceil() as u16;
        (col, row, w, h)
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        let (x, y, w, h) = self.rect();
        col >= x && col < x + w && row >= y && row < y + h
    }

    /// Fraction of this block's lifetime still left
    fn remaining(&self) -> f32 {
        let elapsed = self.spawned.elapsed().as_millis() as f32;
        (1.0 - elapsed / self.lifetime_ms as f32).clamp(0.0, 1.0)
    }
}

#[derive(Default)]
struct Hud {
    score: u64,
    lives: u8,
}

enum Screen {
    NameEntry,
    Playing,
    GameOver { player: String, score: u64 },
}

/// Playfield size in sim units for the current terminal size
fn bounds_for(cols: u16, rows: u16) -> Vec2 {
    Vec2::new(
        cols as f32 * UNITS_PER_COL,
        rows.saturating_sub(HUD_ROWS) as f32 * UNITS_PER_ROW,
    )
}

fn main() -> io::Result<()> {
    env_logger::init();

    let tuning = match load_tuning() {
        Ok(tuning) => tuning,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    let mut state = GameState::new(tuning, seed);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        EnableMouseCapture,
    )?;

    let result = run(&mut out, &mut state);

    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
    )?;
    terminal::disable_raw_mode()?;
    result
}

/// Tuning overrides come from a JSON file named by `BLOCK_RUSH_TUNING`.
fn load_tuning() -> Result<GameTuning, String> {
    let Ok(path) = std::env::var("BLOCK_RUSH_TUNING") else {
        return Ok(GameTuning::default());
    };
    let json = std::fs::read_to_string(&path)
        .map_err(|err| format!("cannot read tuning file {path}: {err}"))?;
    GameTuning::from_json_str(&json).map_err(|err| format!("bad tuning file {path}: {err}"))
}

fn run(out: &mut io::Stdout, state: &mut GameState) -> io::Result<()> {
    let frame_dur = Duration::from_millis(FRAME_MS);
    let mut screen = Screen::NameEntry;
    let mut name = String::new();
    let mut hud = Hud::default();
    let mut views: Vec<BlockView> = Vec::new();
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        let (cols, rows) = terminal::size()?;

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match (&screen, key.code) {
                    (_, KeyCode::Esc) => return Ok(()),
                    (Screen::Playing, KeyCode::Char('q')) => return Ok(()),
                    (Screen::NameEntry, KeyCode::Enter) => {
                        if state.start(&name).is_ok() {
                            state.set_bounds(bounds_for(cols, rows));
                            views.clear();
                            last_tick = Instant::now();
                            screen = Screen::Playing;
                        }
                    }
                    (Screen::NameEntry, KeyCode::Backspace) => {
                        name.pop();
                    }
                    (Screen::NameEntry, KeyCode::Char(c)) => {
                        if name.len() < 20 {
                            name.push(c);
                        }
                    }
                    (Screen::GameOver { .. }, KeyCode::Enter | KeyCode::Char('r')) => {
                        state.reset();
                        name.clear();
                        screen = Screen::NameEntry;
                    }
                    (Screen::GameOver { .. }, KeyCode::Char('q')) => return Ok(()),
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let button = match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => Some(PointerButton::Left),
                        MouseEventKind::Down(MouseButton::Right) => Some(PointerButton::Right),
                        _ => None,
                    };
                    if let Some(button) = button {
                        // Front-most block under the pointer gets the click
                        let target = views
                            .iter()
                            .rev()
                            .find(|view| view.contains(mouse.column, mouse.row))
                            .map(|view| view.id);
                        if let Some(id) = target {
                            state.pointer_input(id, button);
                        }
                    }
                }
                Event::Resize(c, r) => {
                    state.set_bounds(bounds_for(c, r));
                }
                _ => {}
            }
        }

        // Drive the simulation clock (whole milliseconds, remainder carried)
        let dt_ms = last_tick.elapsed().as_millis() as u64;
        if dt_ms > 0 {
            tick(state, dt_ms);
            last_tick += Duration::from_millis(dt_ms);
        }

        // Apply outbound events to the local view
        for ev in state.drain_events() {
            match ev {
                GameEvent::BlockSpawned {
                    id,
                    required,
                    pos,
                    lifetime_ms,
                } => views.push(BlockView {
                    id,
                    required,
                    pos,
                    spawned: Instant::now(),
                    lifetime_ms,
                }),
                GameEvent::BlockRemoved { id } => views.retain(|v| v.id != id),
                GameEvent::ScoreChanged(score) => hud.score = score,
                GameEvent::LivesChanged(lives) => hud.lives = lives,
                GameEvent::GameOver {
                    player,
                    final_score,
                } => {
                    views.clear();
                    screen = Screen::GameOver {
                        player,
                        score: final_score,
                    };
                }
                GameEvent::ReadyForInput(_) => {}
            }
        }

        // Render
        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        match &screen {
            Screen::NameEntry => draw_name_entry(out, cols, rows, &name)?,
            Screen::Playing => draw_playing(out, cols, rows, &hud, &views, &state.player)?,
            Screen::GameOver { player, score } => draw_game_over(out, cols, rows, player, *score)?,
        }
        out.flush()?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn centered(cols: u16, text: &str) -> u16 {
    (cols.saturating_sub(text.len() as u16)) / 2
}

fn draw_name_entry(out: &mut io::Stdout, cols: u16, rows: u16, name: &str) -> io::Result<()> {
    let mid = rows / 2;
    let title = "B L O C K   R U S H";
    let prompt = format!("Player name: {name}_");
    let help = "[Enter] start   [Esc] quit";
    queue!(
        out,
        cursor::MoveTo(centered(cols, title), mid.saturating_sub(2)),
        style::SetForegroundColor(Color::Yellow),
        style::Print(title),
        cursor::MoveTo(centered(cols, &prompt), mid),
        style::SetForegroundColor(Color::White),
        style::Print(&prompt),
        cursor::MoveTo(centered(cols, help), mid + 2),
        style::SetForegroundColor(Color::DarkGrey),
        style::Print(help),
        style::ResetColor,
    )
}

fn draw_playing(
    out: &mut io::Stdout,
    cols: u16,
    rows: u16,
    hud: &Hud,
    views: &[BlockView],
    player: &str,
) -> io::Result<()> {
    // HUD line
    let hearts = "\u{2665}".repeat(hud.lives as usize);
    queue!(
        out,
        cursor::MoveTo(0, 0),
        style::SetForegroundColor(Color::White),
        style::Print(format!("{player}  score: {}  ", hud.score)),
        style::SetForegroundColor(Color::Red),
        style::Print(hearts),
        style::ResetColor,
    )?;

    for view in views {
        draw_block(out, cols, rows, view)?;
    }
    Ok(())
}

fn draw_block(out: &mut io::Stdout, cols: u16, rows: u16, view: &BlockView) -> io::Result<()> {
    let (x, y, w, h) = view.rect();
    let (bg, label) = match view.required {
        PointerButton::Left => (Color::DarkBlue, "LEFT"),
        PointerButton::Right => (Color::DarkMagenta, "RIGHT"),
    };

    queue!(out, style::SetBackgroundColor(bg))?;
    for row in y..(y + h).min(rows) {
        if x >= cols {
            break;
        }
        let width = w.min(cols - x) as usize;
        queue!(out, cursor::MoveTo(x, row))?;
        if row == y + h / 2 {
            // Label row
            let mut line = " ".repeat(width);
            if width >= label.len() {
                let pad = (width - label.len()) / 2;
                line.replace_range(pad..pad + label.len(), label);
            }
            queue!(
                out,
                style::SetForegroundColor(Color::White),
                style::Print(line),
            )?;
        } else if row == y + h - 1 {
            // Countdown bar, shrinking with the lifetime fixed at spawn
            let filled = (width as f32 * view.remaining()).round() as usize;
            queue!(
                out,
                style::SetBackgroundColor(Color::Green),
                style::Print(" ".repeat(filled)),
                style::SetBackgroundColor(bg),
                style::Print(" ".repeat(width - filled)),
            )?;
        } else {
            queue!(out, style::Print(" ".repeat(width)))?;
        }
    }
    queue!(out, style::ResetColor)
}

fn draw_game_over(
    out: &mut io::Stdout,
    cols: u16,
    rows: u16,
    player: &str,
    score: u64,
) -> io::Result<()> {
    let mid = rows / 2;
    let title = "G A M E   O V E R";
    let tally = format!("{player} - final score: {score}");
    let help = "[Enter] play again   [q] quit";
    queue!(
        out,
        cursor::MoveTo(centered(cols, title), mid.saturating_sub(2)),
        style::SetForegroundColor(Color::Red),
        style::Print(title),
        cursor::MoveTo(centered(cols, &tally), mid),
        style::SetForegroundColor(Color::Yellow),
        style::Print(&tally),
        cursor::MoveTo(centered(cols, help), mid + 2),
        style::SetForegroundColor(Color::DarkGrey),
        style::Print(help),
        style::ResetColor,
    )
}
