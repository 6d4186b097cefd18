//! Raw input classification.
//!
//! Key presses map directly to commands. Pointer activations go through a
//! two-state debouncer:
//!
//! ```text
//! Idle --press--> PendingSingle(deadline)
//! PendingSingle --press before deadline--> Idle   (TogglePause)
//! PendingSingle --deadline reached-------> Idle   (ToggleZen)
//! ```
//!
//! Deadlines are plain epoch-millisecond comparisons; the caller polls.

use serde::{Deserialize, Serialize};

/// Commands the engine accepts from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ToggleZen,
    TogglePause,
    QuickReset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    Key(char),
    /// Pointer press-release without movement.
    Press,
    /// Vertical drag released with the given offset (logical px) and
    /// velocity (px/s).
    DragRelease { offset_y: f64, velocity_y: f64 },
}

/// Case-insensitive key bindings: `z` zen, `r` quick reset, `p` pause.
pub fn classify_key(key: char) -> Option<Command> {
    match key.to_ascii_lowercase() {
        'z' => Some(Command::ToggleZen),
        'r' => Some(Command::QuickReset),
        'p' => Some(Command::TogglePause),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapState {
    #[default]
    Idle,
    PendingSingle {
        deadline_ms: u64,
    },
}

#[derive(Debug, Clone)]
pub struct TapDebouncer {
    window_ms: u64,
    state: TapState,
}

impl TapDebouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            state: TapState::Idle,
        }
    }

    pub fn state(&self) -> TapState {
        self.state
    }

    pub fn deadline(&self) -> Option<u64> {
        match self.state {
            TapState::PendingSingle { deadline_ms } => Some(deadline_ms),
            TapState::Idle => None,
        }
    }

    /// Register a press. A second press inside the window is a double
    /// activation; a press arriving after an unpolled deadline first
    /// resolves the stale single activation.
    pub fn press(&mut self, now_ms: u64) -> Option<Command> {
        match self.state {
            TapState::PendingSingle { deadline_ms } if now_ms < deadline_ms => {
                self.state = TapState::Idle;
                Some(Command::TogglePause)
            }
            TapState::PendingSingle { .. } => {
                self.state = self.pending(now_ms);
                Some(Command::ToggleZen)
            }
            TapState::Idle => {
                self.state = self.pending(now_ms);
                None
            }
        }
    }

    /// Fire the single activation once its window has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Command> {
        match self.state {
            TapState::PendingSingle { deadline_ms } if now_ms >= deadline_ms => {
                self.state = TapState::Idle;
                Some(Command::ToggleZen)
            }
            _ => None,
        }
    }

    fn pending(&self, now_ms: u64) -> TapState {
        TapState::PendingSingle {
            deadline_ms: now_ms.saturating_add(self.window_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    pub min_offset: f64,
    pub min_velocity: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_offset: 100.0,
            min_velocity: 500.0,
        }
    }
}

impl SwipeThresholds {
    /// A sharp vertical swipe in either direction resets.
    pub fn classify(&self, offset_y: f64, velocity_y: f64) -> Option<Command> {
        (offset_y.abs() > self.min_offset && velocity_y.abs() > self.min_velocity)
            .then_some(Command::QuickReset)
    }
}

/// Full input pipeline for the calculator surface.
#[derive(Debug, Clone)]
pub struct Disambiguator {
    taps: TapDebouncer,
    swipe: SwipeThresholds,
}

impl Disambiguator {
    pub fn new(double_tap_window_ms: u64, swipe: SwipeThresholds) -> Self {
        Self {
            taps: TapDebouncer::new(double_tap_window_ms),
            swipe,
        }
    }

    pub fn handle(&mut self, input: RawInput, now_ms: u64) -> Option<Command> {
        match input {
            RawInput::Key(key) => classify_key(key),
            RawInput::Press => self.taps.press(now_ms),
            RawInput::DragRelease {
                offset_y,
                velocity_y,
            } => self.swipe.classify(offset_y, velocity_y),
        }
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<Command> {
        self.taps.poll(now_ms)
    }

    /// When the pending single activation resolves, if one is pending.
    pub fn deadline(&self) -> Option<u64> {
        self.taps.deadline()
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new(250, SwipeThresholds::default())
    }
}
