use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionState;
use crate::settings::Settings;
use crate::view::{Screen, Theme};

/// Every state change in the engine produces an Event.
/// Front ends render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        start_instant_ms: u64,
        rate_per_sec: f64,
        at: DateTime<Utc>,
    },
    /// A running session was picked up again from storage or a shared link.
    SessionRestored {
        start_instant_ms: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_seconds: f64,
        earnings: f64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        at: DateTime<Utc>,
    },
    /// `quick` resets restart in place and carry the new start instant.
    SessionReset {
        quick: bool,
        start_instant_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        threshold: u32,
        earnings: f64,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: Settings,
        rate_per_sec: f64,
        at: DateTime<Utc>,
    },
    ZenModeChanged {
        zen_mode: bool,
        at: DateTime<Utc>,
    },
    ScreenChanged {
        screen: Screen,
        at: DateTime<Utc>,
    },
    ThemeChanged {
        theme: Theme,
        at: DateTime<Utc>,
    },
    LinkCopied {
        url: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        screen: Screen,
        zen_mode: bool,
        theme: Theme,
        start_instant_ms: Option<u64>,
        elapsed_seconds: f64,
        earnings: f64,
        rate_per_sec: f64,
        last_celebrated_milestone: u32,
        next_milestone: Option<u32>,
        at: DateTime<Utc>,
    },
}
