//! Live calculator surface.
//!
//! Draws the running total on one terminal line and feeds key presses, clicks
//! and vertical mouse drags through the engine's input disambiguator.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveToColumn, Show};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as TermEvent, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use earntrack_core::clock::now_ms;
use earntrack_core::format::format_elapsed;
use earntrack_core::{Celebrations, Config, Event, Notifier, ParticleSink, RawInput, SessionState, Ticker};
use futures::StreamExt;

use super::{money, open_engine, AppEngine, CliResult};

/// Terminal rows are converted to pixels so drag thresholds keep their meaning.
const ROW_HEIGHT_PX: f64 = 20.0;
const TOAST_MS: u64 = 3000;
const REDRAW_MS: u64 = 250;

pub async fn run(url: Option<&str>) -> CliResult {
    let (engine, config) = open_engine(url)?;
    let effects = Arc::new(TerminalEffects::default());
    let mut engine = if config.celebration.enabled {
        engine.with_celebrations(Celebrations::new(
            effects.clone(),
            effects.clone(),
            config.celebration.fireworks(),
        ))
    } else {
        engine
    };

    if engine.session_state() == SessionState::Idle {
        engine.start()?;
    }

    let guard = TerminalGuard::enter()?;
    let result = event_loop(&mut engine, &config, &effects).await;
    drop(guard);
    println!();
    result
}

enum Flow {
    Continue,
    Quit,
}

async fn event_loop(engine: &mut AppEngine, config: &Config, effects: &TerminalEffects) -> CliResult {
    let mut ticker = Ticker::new(config.ticker.interval());
    let mut redraw = tokio::time::interval(Duration::from_millis(REDRAW_MS));
    let mut events = EventStream::new();
    let mut drag: Option<DragStart> = None;

    loop {
        ticker.sync(engine.is_ticking());
        let deadline = engine
            .input_deadline()
            .map(|d| Duration::from_millis(d.saturating_sub(now_ms())));

        tokio::select! {
            _ = ticker.tick() => {
                if let Some(Event::MilestoneReached { threshold, .. }) =
                    engine.tick().and_then(|report| report.milestone)
                {
                    tracing::debug!(threshold, "celebrating");
                }
            }
            _ = wait(deadline) => {
                engine.poll_input();
            }
            _ = redraw.tick() => {}
            maybe = events.next() => match maybe {
                Some(Ok(event)) => {
                    if let Flow::Quit = handle_event(engine, event, &mut drag) {
                        break;
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }

        render(engine, config, effects)?;
    }
    Ok(())
}

async fn wait(deadline: Option<Duration>) {
    match deadline {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending::<()>().await,
    }
}

struct DragStart {
    row: u16,
    at: Instant,
}

fn handle_event(engine: &mut AppEngine, event: TermEvent, drag: &mut Option<DragStart>) -> Flow {
    match event {
        TermEvent::Key(key) => return handle_key(engine, key),
        TermEvent::Mouse(MouseEvent { kind, row, .. }) => match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                *drag = Some(DragStart {
                    row,
                    at: Instant::now(),
                });
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(start) = drag.take() {
                    engine.handle_input(release(&start, row));
                }
            }
            _ => {}
        },
        _ => {}
    }
    Flow::Continue
}

fn handle_key(engine: &mut AppEngine, key: KeyEvent) -> Flow {
    if key.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
        KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => {
            engine.handle_input(RawInput::Press);
        }
        KeyCode::Char(c) => {
            engine.handle_input(RawInput::Key(c));
        }
        _ => {}
    }
    Flow::Continue
}

/// A release on the press row is a tap; anything else is a drag.
fn release(start: &DragStart, row: u16) -> RawInput {
    if row == start.row {
        return RawInput::Press;
    }
    let offset_y = (f64::from(row) - f64::from(start.row)) * ROW_HEIGHT_PX;
    let secs = start.at.elapsed().as_secs_f64().max(0.001);
    RawInput::DragRelease {
        offset_y,
        velocity_y: offset_y / secs,
    }
}

fn render(engine: &AppEngine, config: &Config, effects: &TerminalEffects) -> io::Result<()> {
    let session = engine.session();
    let currency = engine.settings().currency;
    let mut line = if engine.view().zen_mode {
        money(session.earnings, currency, config.display.earnings_decimals)
    } else {
        format!(
            "{}  {}  {}/s",
            money(session.earnings, currency, config.display.earnings_decimals),
            format_elapsed(session.elapsed_seconds),
            money(engine.rate(), currency, config.display.earnings_decimals),
        )
    };
    if session.is_paused {
        line.push_str("  [paused]");
    }
    if engine.reset_notice_visible() {
        line.push_str("  Reset!");
    }
    if let Some(toast) = effects.toast() {
        line.push_str("  ");
        line.push_str(&toast);
    }

    let mut out = io::stdout();
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line))?;
    out.flush()
}

/// Celebration output for a one-line terminal: the toast is shown inline with
/// a sparkle trail sized by the latest burst.
#[derive(Default)]
struct TerminalEffects {
    toast: Mutex<Option<(String, u64)>>,
    particles: Mutex<u32>,
}

impl TerminalEffects {
    fn toast(&self) -> Option<String> {
        let toast = self.toast.lock().ok()?;
        let (text, shown_at) = toast.as_ref()?;
        if now_ms().saturating_sub(*shown_at) >= TOAST_MS {
            return None;
        }
        let particles = self.particles.lock().map(|p| *p).unwrap_or(0);
        Some(format!("{text} {}", "*".repeat((particles / 10) as usize)))
    }
}

impl Notifier for TerminalEffects {
    fn notify(&self, title: &str, message: &str) {
        if let Ok(mut toast) = self.toast.lock() {
            *toast = Some((format!("{title} {message}"), now_ms()));
        }
    }
}

impl ParticleSink for TerminalEffects {
    fn burst(&self, _origin_x: f64, _origin_y: f64, particle_count: u32) {
        if let Ok(mut particles) = self.particles.lock() {
            *particles = particle_count;
        }
    }
}

/// Raw mode and mouse capture for the lifetime of the guard.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnableMouseCapture, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture, Show);
        let _ = terminal::disable_raw_mode();
    }
}
