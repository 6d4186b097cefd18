//! Session clock.
//!
//! Elapsed time and earnings are always derived from a fixed start instant,
//! never accumulated from tick deltas, so missed or irregular ticks cannot
//! introduce drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running | Paused -> Idle              (full reset)
//! Running | Paused -> Running           (quick reset, new start instant)
//! ```
//!
//! Resuming does not move the start instant: the first tick after a resume
//! jumps forward by the paused duration.

mod milestone;
mod ticker;

pub use milestone::{
    celebration_text, Burst, Celebrations, Fireworks, MilestoneNotifier, Notifier, ParticleSink,
    MILESTONES,
};
pub use ticker::Ticker;

use serde::{Deserialize, Serialize};

use crate::clock::timestamp;
use crate::error::SessionError;
use crate::events::Event;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

/// Observable session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub start_instant: Option<u64>,
    pub is_running: bool,
    pub is_paused: bool,
    pub elapsed_seconds: f64,
    pub earnings: f64,
    pub last_celebrated_milestone: u32,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub elapsed_seconds: f64,
    pub earnings: f64,
    /// Threshold crossed by this tick, if any.
    pub milestone: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    state: SessionState,
    start_instant: Option<u64>,
    elapsed_seconds: f64,
    earnings: f64,
    rate: f64,
    milestones: MilestoneNotifier,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SessionClock {
    pub fn new(rate: f64) -> Self {
        Self {
            state: SessionState::Idle,
            start_instant: None,
            elapsed_seconds: 0.0,
            earnings: 0.0,
            rate,
            milestones: MilestoneNotifier::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn start_instant(&self) -> Option<u64> {
        self.start_instant
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn earnings(&self) -> f64 {
        self.earnings
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn milestones(&self) -> &MilestoneNotifier {
        &self.milestones
    }

    /// `true` while the repeating tick should be scheduled.
    pub fn is_ticking(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn session(&self) -> Session {
        Session {
            start_instant: self.start_instant,
            is_running: self.state != SessionState::Idle,
            is_paused: self.state == SessionState::Paused,
            elapsed_seconds: self.elapsed_seconds,
            earnings: self.earnings,
            last_celebrated_milestone: self.milestones.last_celebrated(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the rate. Takes effect at the next tick, applied to the full
    /// elapsed time since the start instant.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Begin a new session at `now_ms`.
    pub fn start(&mut self, settings: &Settings, now_ms: u64) -> Result<Event, SessionError> {
        if !settings.has_valid_salary() {
            return Err(SessionError::InvalidSalary {
                salary: settings.salary,
            });
        }
        self.begin(now_ms);
        Ok(Event::SessionStarted {
            start_instant_ms: now_ms,
            rate_per_sec: self.rate,
            at: timestamp(now_ms),
        })
    }

    /// Pick up a running session anchored at an earlier start instant.
    pub fn restore(&mut self, start_instant_ms: u64, now_ms: u64) -> Event {
        self.begin(start_instant_ms);
        Event::SessionRestored {
            start_instant_ms,
            at: timestamp(now_ms),
        }
    }

    /// Recompute elapsed time and earnings without touching milestones.
    /// Returns `false` unless running.
    pub fn measure(&mut self, now_ms: u64) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(start) = self.start_instant else {
            return false;
        };
        self.elapsed_seconds = (now_ms as f64 - start as f64) / 1000.0;
        self.earnings = self.elapsed_seconds * self.rate;
        true
    }

    /// Recompute elapsed time and earnings and report a crossed milestone.
    /// Does nothing unless running.
    pub fn tick(&mut self, now_ms: u64) -> Option<TickOutcome> {
        if !self.measure(now_ms) {
            return None;
        }
        let milestone = self.milestones.observe(self.earnings);
        Some(TickOutcome {
            elapsed_seconds: self.elapsed_seconds,
            earnings: self.earnings,
            milestone,
        })
    }

    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        Some(Event::SessionPaused {
            elapsed_seconds: self.elapsed_seconds,
            earnings: self.earnings,
            at: timestamp(now_ms),
        })
    }

    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.state = SessionState::Running;
        Some(Event::SessionResumed {
            at: timestamp(now_ms),
        })
    }

    /// Pause when running, resume when paused, nothing when idle.
    pub fn toggle_pause(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            SessionState::Running => self.pause(now_ms),
            SessionState::Paused => self.resume(now_ms),
            SessionState::Idle => None,
        }
    }

    /// Zero the accumulator and milestones. A quick reset restarts the
    /// session at `now_ms`; a full reset stops it.
    pub fn reset(&mut self, quick: bool, now_ms: u64) -> Event {
        if quick {
            self.begin(now_ms);
        } else {
            self.state = SessionState::Idle;
            self.start_instant = None;
            self.elapsed_seconds = 0.0;
            self.earnings = 0.0;
            self.milestones.reset();
        }
        Event::SessionReset {
            quick,
            start_instant_ms: self.start_instant,
            at: timestamp(now_ms),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self, start_instant_ms: u64) {
        self.state = SessionState::Running;
        self.start_instant = Some(start_instant_ms);
        self.elapsed_seconds = 0.0;
        self.earnings = 0.0;
        self.milestones.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::per_second_rate;

    const T0: u64 = 1_700_000_000_000;

    fn running_clock() -> SessionClock {
        let settings = Settings::default();
        let mut clock = SessionClock::new(per_second_rate(&settings));
        clock.start(&settings, T0).unwrap();
        clock
    }

    #[test]
    fn start_pause_resume() {
        let mut clock = running_clock();
        assert_eq!(clock.state(), SessionState::Running);

        assert!(clock.pause(T0 + 10).is_some());
        assert_eq!(clock.state(), SessionState::Paused);
        assert!(clock.pause(T0 + 20).is_none());

        assert!(clock.resume(T0 + 30).is_some());
        assert_eq!(clock.state(), SessionState::Running);
    }

    #[test]
    fn start_rejects_invalid_salary_without_state_change() {
        let mut clock = SessionClock::new(0.0);
        for salary in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let settings = Settings {
                salary,
                ..Settings::default()
            };
            let err = clock.start(&settings, T0).unwrap_err();
            assert!(matches!(err, SessionError::InvalidSalary { .. }));
            assert_eq!(clock.state(), SessionState::Idle);
            assert_eq!(clock.start_instant(), None);
        }
    }

    #[test]
    fn tick_is_anchored_to_start_instant() {
        let mut clock = running_clock();
        let out = clock.tick(T0 + 2_500).unwrap();
        assert_eq!(out.elapsed_seconds, 2.5);
        assert_eq!(out.earnings, 2.5 * clock.rate());
    }

    #[test]
    fn tick_is_idempotent_for_same_instant() {
        let mut clock = running_clock();
        let a = clock.tick(T0 + 40_000).unwrap();
        let b = clock.tick(T0 + 40_000).unwrap();
        assert_eq!(a.elapsed_seconds, b.elapsed_seconds);
        assert_eq!(a.earnings, b.earnings);
    }

    #[test]
    fn earnings_are_monotonic() {
        let mut clock = running_clock();
        let mut last = f64::MIN;
        for offset in (0..10_000).step_by(37) {
            let out = clock.tick(T0 + offset).unwrap();
            assert!(out.earnings >= last);
            last = out.earnings;
        }
    }

    #[test]
    fn missed_ticks_do_not_drift() {
        let mut fine = running_clock();
        let mut coarse = running_clock();
        for offset in (0..=60_000).step_by(50) {
            fine.tick(T0 + offset);
        }
        coarse.tick(T0 + 60_000);
        assert_eq!(fine.earnings(), coarse.earnings());
    }

    #[test]
    fn paused_clock_ignores_ticks() {
        let mut clock = running_clock();
        clock.tick(T0 + 1_000);
        clock.pause(T0 + 1_000);
        assert!(clock.tick(T0 + 5_000).is_none());
        assert_eq!(clock.elapsed_seconds(), 1.0);
    }

    // Resume keeps the original start instant, so the paused span is counted.
    #[test]
    fn resume_jumps_forward_by_paused_duration() {
        let mut clock = running_clock();
        clock.tick(T0 + 10_000);
        clock.pause(T0 + 10_000);
        clock.resume(T0 + 70_000);
        let out = clock.tick(T0 + 70_050).unwrap();
        assert_eq!(out.elapsed_seconds, 70.05);
        assert_eq!(clock.start_instant(), Some(T0));
    }

    #[test]
    fn full_reset_clears_session() {
        let mut clock = running_clock();
        clock.tick(T0 + 3_600_000);
        assert!(clock.milestones().last_celebrated() > 0);

        let event = clock.reset(false, T0 + 3_600_001);
        assert!(matches!(
            event,
            Event::SessionReset {
                quick: false,
                start_instant_ms: None,
                ..
            }
        ));
        let session = clock.session();
        assert!(!session.is_running);
        assert_eq!(session.start_instant, None);
        assert_eq!(session.earnings, 0.0);
        assert_eq!(session.last_celebrated_milestone, 0);
        assert!(clock.tick(T0 + 3_700_000).is_none());
    }

    #[test]
    fn quick_reset_restarts_in_place() {
        let mut clock = running_clock();
        clock.tick(T0 + 3_600_000);
        clock.pause(T0 + 3_600_000);

        let now = T0 + 3_700_000;
        clock.reset(true, now);
        assert_eq!(clock.state(), SessionState::Running);
        assert_eq!(clock.start_instant(), Some(now));
        assert_eq!(clock.milestones().last_celebrated(), 0);
        let out = clock.tick(now).unwrap();
        assert_eq!(out.elapsed_seconds, 0.0);
    }

    #[test]
    fn rate_change_applies_to_whole_elapsed_span() {
        let mut clock = running_clock();
        clock.tick(T0 + 10_000);
        clock.set_rate(2.0);
        let out = clock.tick(T0 + 10_000).unwrap();
        assert_eq!(out.earnings, 20.0);
    }

    #[test]
    fn measure_leaves_milestones_alone() {
        let mut clock = running_clock();
        assert!(clock.measure(T0 + 120_000));
        assert!(clock.earnings() > 1.0);
        assert_eq!(clock.milestones().next_threshold(), Some(1));

        clock.pause(T0 + 120_000);
        assert!(!clock.measure(T0 + 180_000));
        assert_eq!(clock.elapsed_seconds(), 120.0);
    }

    #[test]
    fn toggle_pause_is_noop_when_idle() {
        let mut clock = SessionClock::new(1.0);
        assert!(clock.toggle_pause(T0).is_none());
        assert_eq!(clock.state(), SessionState::Idle);
    }

    #[test]
    fn milestones_fire_through_ticks() {
        let mut clock = SessionClock::new(1.0);
        clock.restore(T0, T0);
        let fired: Vec<u32> = [500, 1_000, 1_500, 8_000, 9_000, 18_000, 18_000]
            .into_iter()
            .filter_map(|ms| clock.tick(T0 + ms).and_then(|o| o.milestone))
            .collect();
        assert_eq!(fired, vec![1, 8, 18]);
    }
}
