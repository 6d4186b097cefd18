//! Earnings engine: the single owner of settings, session and view state.
//!
//! Every mutation goes through a method here, which updates the in-memory
//! state, mirrors it to durable storage and the page location, and returns the
//! resulting [`Event`]. Storage failures are logged and never interrupt the
//! session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = Engine::load(store, SystemClock, location, options);
//! engine.start()?;
//! // every ~50ms while the session is ticking:
//! if let Some(report) = engine.tick() { render(report) }
//! ```

use url::Url;

use crate::clock::{timestamp, Clock};
use crate::error::{ConfigError, CoreError, SessionError, ValidationError};
use crate::events::Event;
use crate::input::{Command, Disambiguator, RawInput, SwipeThresholds};
use crate::link::{self, Clipboard, Location};
use crate::rate::per_second_rate;
use crate::resolver::resolve;
use crate::session::{Celebrations, Session, SessionClock, SessionState};
use crate::settings::{Settings, SettingsField};
use crate::storage::{keys, Config, KeyValueStore};
use crate::view::{Notices, Screen, Theme, ViewState};

/// Engine tuning derived from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub double_tap_window_ms: u64,
    pub swipe: SwipeThresholds,
    pub reset_notice_ms: u64,
    pub copied_notice_ms: u64,
    /// Location assumed when the process was not opened from a link.
    pub base_url: Url,
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.link.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "link.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(Self {
            double_tap_window_ms: config.input.double_tap_window_ms,
            swipe: config.input.swipe(),
            reset_notice_ms: config.display.reset_notice_ms,
            copied_notice_ms: config.display.copied_notice_ms,
            base_url,
        })
    }
}

/// What one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub elapsed_seconds: f64,
    pub earnings: f64,
    pub milestone: Option<Event>,
}

pub struct Engine<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    settings: Settings,
    session: SessionClock,
    view: ViewState,
    location: Location,
    notices: Notices,
    input: Disambiguator,
    celebrations: Option<Celebrations>,
    options: EngineOptions,
    restored: Option<Event>,
}

impl<S: KeyValueStore, C: Clock> Engine<S, C> {
    /// Build the engine at process start.
    ///
    /// Settings come from the location, the stored blob and the defaults, in
    /// that order. Settings parameters in the location force the calculator
    /// screen, zen mode and a fresh session; otherwise a stored start instant
    /// resumes the earlier session.
    pub fn load(store: S, clock: C, location: Option<Location>, options: EngineOptions) -> Self {
        let now = clock.now_ms();
        let stored_settings = read(&store, keys::SETTINGS);
        let resolution = resolve(location.as_ref(), stored_settings.as_deref());
        let location = location.unwrap_or_else(|| Location::new(options.base_url.clone()));

        let theme = read(&store, keys::THEME)
            .and_then(|v| v.parse::<Theme>().ok())
            .unwrap_or_default();
        let screen = if resolution.url_override {
            Screen::Calculator
        } else {
            read(&store, keys::VIEW)
                .and_then(|v| v.parse::<Screen>().ok())
                .unwrap_or_default()
        };

        let settings = resolution.settings;
        let mut session = SessionClock::new(per_second_rate(&settings));
        let restored = if resolution.url_override {
            tracing::info!(start_instant_ms = now, "session started from link");
            Some(session.restore(now, now))
        } else if let Some(start) = read(&store, keys::START_TIME).and_then(|v| parse_start(&v)) {
            tracing::info!(start_instant_ms = start, "session restored from storage");
            Some(session.restore(start, now))
        } else {
            None
        };

        let input = Disambiguator::new(options.double_tap_window_ms, options.swipe);
        let mut engine = Self {
            store,
            clock,
            settings,
            session,
            view: ViewState {
                screen,
                zen_mode: resolution.zen_mode,
                theme,
            },
            location,
            notices: Notices::default(),
            input,
            celebrations: None,
            options,
            restored,
        };

        engine.location.mirror_zen(engine.view.zen_mode);
        engine.persist_settings();
        engine.persist(keys::VIEW, engine.view.screen.as_str());
        engine.persist(keys::THEME, engine.view.theme.as_str());
        engine
    }

    pub fn with_celebrations(mut self, celebrations: Celebrations) -> Self {
        self.celebrations = Some(celebrations);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rate(&self) -> f64 {
        self.session.rate()
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// `true` while the repeating tick should run.
    pub fn is_ticking(&self) -> bool {
        self.session.is_ticking()
    }

    /// The `SessionRestored` event when [`Engine::load`] picked up a session.
    pub fn restored(&self) -> Option<&Event> {
        self.restored.as_ref()
    }

    /// The threshold the current session will celebrate next.
    pub fn next_milestone(&self) -> Option<u32> {
        self.session.milestones().next_threshold()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn reset_notice_visible(&self) -> bool {
        self.notices.reset_visible(self.clock.now_ms())
    }

    pub fn copied_notice_visible(&self) -> bool {
        self.notices.copied_visible(self.clock.now_ms())
    }

    /// When a pending single activation resolves; poll the engine then.
    pub fn input_deadline(&self) -> Option<u64> {
        self.input.deadline()
    }

    pub fn share_url(&self) -> Url {
        link::share_url(&self.location.base(), &self.settings)
    }

    /// The clipboard form of the share link, opening in zen mode.
    pub fn share_link(&self) -> String {
        link::share_link(&self.location.base(), &self.settings)
    }

    pub fn snapshot(&self) -> Event {
        let session = self.session.session();
        Event::StateSnapshot {
            state: self.session.state(),
            screen: self.view.screen,
            zen_mode: self.view.zen_mode,
            theme: self.view.theme,
            start_instant_ms: session.start_instant,
            elapsed_seconds: session.elapsed_seconds,
            earnings: session.earnings,
            rate_per_sec: self.session.rate(),
            last_celebrated_milestone: session.last_celebrated_milestone,
            next_milestone: self.next_milestone(),
            at: timestamp(self.clock.now_ms()),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn update_settings(&mut self, settings: Settings) -> Event {
        self.settings = settings;
        let rate = per_second_rate(&self.settings);
        self.session.set_rate(rate);
        self.persist_settings();
        tracing::debug!(rate_per_sec = rate, "settings updated");
        Event::SettingsChanged {
            settings: self.settings,
            rate_per_sec: rate,
            at: timestamp(self.clock.now_ms()),
        }
    }

    /// Apply a field edit as typed. Work hours are range-corrected only by
    /// [`Engine::commit_work_hours`].
    pub fn edit_setting(&mut self, field: SettingsField, raw: &str) -> Result<Event, ValidationError> {
        let mut next = self.settings;
        next.set_field(field, raw)?;
        Ok(self.update_settings(next))
    }

    /// Finish editing work hours; out-of-range values fall back to the default.
    pub fn commit_work_hours(&mut self) -> Option<Event> {
        let mut next = self.settings;
        if !next.commit_work_hours() {
            return None;
        }
        Some(self.update_settings(next))
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Start a new session from the current settings.
    ///
    /// # Errors
    /// Returns `InvalidSalary` without changing any state when the salary
    /// cannot produce income.
    pub fn start(&mut self) -> Result<Event, SessionError> {
        let now = self.clock.now_ms();
        let event = self.session.start(&self.settings, now).inspect_err(|e| {
            tracing::info!(error = %e, "start rejected");
        })?;
        self.persist(keys::START_TIME, &now.to_string());
        self.set_screen(Screen::Calculator);
        tracing::info!(start_instant_ms = now, "session started");
        Ok(event)
    }

    pub fn tick(&mut self) -> Option<TickReport> {
        let now = self.clock.now_ms();
        let outcome = self.session.tick(now)?;
        let milestone = outcome.milestone.map(|threshold| {
            tracing::info!(threshold, earnings = outcome.earnings, "milestone reached");
            if let Some(celebrations) = &self.celebrations {
                // detached: the effect outlives any session change
                let _ = celebrations.celebrate(threshold, self.settings.currency);
            }
            Event::MilestoneReached {
                threshold,
                earnings: outcome.earnings,
                at: timestamp(now),
            }
        });
        Some(TickReport {
            elapsed_seconds: outcome.elapsed_seconds,
            earnings: outcome.earnings,
            milestone,
        })
    }

    /// Bring elapsed time and earnings up to now without reporting or
    /// celebrating milestones. Returns `false` unless running.
    pub fn refresh(&mut self) -> bool {
        self.session.measure(self.clock.now_ms())
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.session.pause(self.clock.now_ms())
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.session.resume(self.clock.now_ms())
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        self.session.toggle_pause(self.clock.now_ms())
    }

    /// Full reset returns to the settings screen and forgets the stored
    /// session; quick reset restarts in place and flashes the reset notice.
    pub fn reset(&mut self, quick: bool) -> Event {
        let now = self.clock.now_ms();
        let event = self.session.reset(quick, now);
        if quick {
            self.persist(keys::START_TIME, &now.to_string());
            self.notices.show_reset(now, self.options.reset_notice_ms);
        } else {
            self.forget(keys::START_TIME);
            self.set_screen(Screen::Settings);
        }
        tracing::info!(quick, "session reset");
        event
    }

    // ── View ─────────────────────────────────────────────────────────

    pub fn set_zen_mode(&mut self, zen_mode: bool) -> Option<Event> {
        if self.view.zen_mode == zen_mode {
            return None;
        }
        self.view.zen_mode = zen_mode;
        self.location.mirror_zen(zen_mode);
        Some(Event::ZenModeChanged {
            zen_mode,
            at: timestamp(self.clock.now_ms()),
        })
    }

    pub fn toggle_zen(&mut self) -> Option<Event> {
        self.set_zen_mode(!self.view.zen_mode)
    }

    pub fn set_screen(&mut self, screen: Screen) -> Option<Event> {
        if self.view.screen == screen {
            return None;
        }
        self.view.screen = screen;
        self.persist(keys::VIEW, screen.as_str());
        Some(Event::ScreenChanged {
            screen,
            at: timestamp(self.clock.now_ms()),
        })
    }

    pub fn set_theme(&mut self, theme: Theme) -> Event {
        self.view.theme = theme;
        self.persist(keys::THEME, theme.as_str());
        Event::ThemeChanged {
            theme,
            at: timestamp(self.clock.now_ms()),
        }
    }

    pub fn toggle_theme(&mut self) -> Event {
        self.set_theme(self.view.theme.toggled())
    }

    /// Put the zen share link on the clipboard and flash the copied notice.
    pub fn copy_share_link(&mut self, clipboard: &dyn Clipboard) -> Result<Event, CoreError> {
        let url = self.share_link();
        clipboard.write_text(&url)?;
        let now = self.clock.now_ms();
        self.notices.show_copied(now, self.options.copied_notice_ms);
        Ok(Event::LinkCopied {
            url,
            at: timestamp(now),
        })
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) -> Option<Event> {
        tracing::debug!(?command, "applying command");
        match command {
            Command::ToggleZen => self.toggle_zen(),
            Command::TogglePause => self.toggle_pause(),
            Command::QuickReset => Some(self.reset(true)),
        }
    }

    /// Keys act everywhere; taps and swipes only on the calculator surface.
    pub fn handle_input(&mut self, input: RawInput) -> Option<Event> {
        if !matches!(input, RawInput::Key(_)) && self.view.screen != Screen::Calculator {
            return None;
        }
        let command = self.input.handle(input, self.clock.now_ms())?;
        self.apply(command)
    }

    /// Resolve a pending single activation whose window has elapsed.
    pub fn poll_input(&mut self) -> Option<Event> {
        let command = self.input.poll(self.clock.now_ms())?;
        self.apply(command)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_settings(&self) {
        match self.settings.to_json() {
            Ok(json) => self.persist(keys::SETTINGS, &json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize settings"),
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "failed to persist");
        }
    }

    fn forget(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove stored value");
        }
    }
}

fn read<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            None
        }
    }
}

fn parse_start(raw: &str) -> Option<u64> {
    let parsed = raw.trim().parse::<u64>().ok();
    if parsed.is_none() {
        tracing::debug!(raw, "ignoring malformed stored start time");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::settings::{Currency, Cycle};
    use crate::storage::MemoryStore;
    use std::cell::RefCell;

    const T0: u64 = 1_700_000_000_000;

    fn options() -> EngineOptions {
        EngineOptions::from_config(&Config::default()).unwrap()
    }

    fn engine_with(store: MemoryStore, url: Option<&str>) -> (Engine<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(T0);
        let location = url.map(|u| Location::parse(u).unwrap());
        (Engine::load(store, clock.clone(), location, options()), clock)
    }

    fn fresh() -> (Engine<MemoryStore, ManualClock>, ManualClock) {
        engine_with(MemoryStore::new(), None)
    }

    #[test]
    fn fresh_load_uses_defaults_and_persists_them() {
        let (engine, _) = fresh();
        assert_eq!(engine.settings(), &Settings::default());
        assert_eq!(engine.view(), ViewState::default());
        assert_eq!(engine.session_state(), SessionState::Idle);

        let store = engine.store();
        assert!(store.get(keys::SETTINGS).unwrap().is_some());
        assert_eq!(store.get(keys::VIEW).unwrap().as_deref(), Some("settings"));
        assert_eq!(store.get(keys::THEME).unwrap().as_deref(), Some("dark"));
        assert!(store.get(keys::START_TIME).unwrap().is_none());
    }

    #[test]
    fn start_switches_screen_and_persists_start() {
        let (mut engine, _) = fresh();
        let event = engine.start().unwrap();
        assert!(matches!(event, Event::SessionStarted { start_instant_ms: T0, .. }));
        assert_eq!(engine.view().screen, Screen::Calculator);
        assert_eq!(
            engine.store().get(keys::START_TIME).unwrap().as_deref(),
            Some("1700000000000")
        );
        assert_eq!(engine.store().get(keys::VIEW).unwrap().as_deref(), Some("calculator"));
    }

    #[test]
    fn start_with_invalid_salary_changes_nothing() {
        let (mut engine, _) = fresh();
        engine.edit_setting(SettingsField::Salary, "0").unwrap();
        let err = engine.start().unwrap_err();
        assert_eq!(err, SessionError::InvalidSalary { salary: 0.0 });
        assert_eq!(engine.session_state(), SessionState::Idle);
        assert_eq!(engine.view().screen, Screen::Settings);
        assert!(engine.store().get(keys::START_TIME).unwrap().is_none());
    }

    #[test]
    fn tick_reports_milestones_in_order() {
        let (mut engine, clock) = fresh();
        engine.update_settings(Settings {
            salary: 3600.0,
            cycle: Cycle::Hourly,
            ..Settings::default()
        });
        engine.start().unwrap();

        let mut fired = Vec::new();
        for _ in 0..400 {
            clock.advance(50);
            if let Some(Event::MilestoneReached { threshold, .. }) =
                engine.tick().and_then(|r| r.milestone)
            {
                fired.push(threshold);
            }
        }
        // 20 seconds at 1/s
        assert_eq!(fired, vec![1, 8, 18]);
        assert_eq!(engine.session().last_celebrated_milestone, 18);
    }

    #[test]
    fn refresh_updates_earnings_without_milestones() {
        let (mut engine, clock) = fresh();
        engine.start().unwrap();
        clock.advance(3_600_000);

        assert!(engine.refresh());
        assert!(engine.session().earnings > 1.0);
        assert_eq!(engine.session().last_celebrated_milestone, 0);
        assert_eq!(engine.next_milestone(), Some(1));

        // the next tick still reports the first crossing
        let report = engine.tick().unwrap();
        assert!(matches!(report.milestone, Some(Event::MilestoneReached { threshold: 1, .. })));
    }

    #[test]
    fn refresh_is_noop_when_idle() {
        let (mut engine, clock) = fresh();
        clock.advance(60_000);
        assert!(!engine.refresh());
        assert_eq!(engine.session().earnings, 0.0);
    }

    #[test]
    fn load_reports_restored_session() {
        let (engine, _) = fresh();
        assert!(engine.restored().is_none());

        let store = MemoryStore::new();
        store.set(keys::START_TIME, "1699999990000").unwrap();
        let (engine, _) = engine_with(store, None);
        assert_eq!(
            engine.restored(),
            Some(&Event::SessionRestored {
                start_instant_ms: T0 - 10_000,
                at: timestamp(T0),
            })
        );
    }

    #[test]
    fn full_reset_clears_start_and_returns_to_settings() {
        let (mut engine, clock) = fresh();
        engine.start().unwrap();
        clock.advance(3_600_000);
        engine.tick();
        assert!(engine.session().last_celebrated_milestone > 0);

        engine.reset(false);
        assert_eq!(engine.view().screen, Screen::Settings);
        assert_eq!(engine.session().start_instant, None);
        assert!(engine.store().get(keys::START_TIME).unwrap().is_none());
        assert_eq!(engine.store().get(keys::VIEW).unwrap().as_deref(), Some("settings"));

        engine.start().unwrap();
        assert_eq!(engine.session().last_celebrated_milestone, 0);
    }

    #[test]
    fn quick_reset_restarts_on_calculator() {
        let (mut engine, clock) = fresh();
        engine.start().unwrap();
        clock.advance(60_000);
        engine.tick();

        let event = engine.apply(Command::QuickReset).unwrap();
        let now = T0 + 60_000;
        assert!(matches!(
            event,
            Event::SessionReset {
                quick: true,
                start_instant_ms: Some(n),
                ..
            } if n == now
        ));
        assert_eq!(engine.view().screen, Screen::Calculator);
        assert_eq!(
            engine.store().get(keys::START_TIME).unwrap(),
            Some(now.to_string())
        );
        let report = engine.tick().unwrap();
        assert_eq!(report.elapsed_seconds, 0.0);

        assert!(engine.reset_notice_visible());
        clock.advance(1_500);
        assert!(!engine.reset_notice_visible());
    }

    #[test]
    fn pause_freezes_display_and_resume_jumps() {
        let (mut engine, clock) = fresh();
        engine.update_settings(Settings {
            salary: 36.0,
            cycle: Cycle::Hourly,
            ..Settings::default()
        });
        engine.start().unwrap();
        clock.advance(10_000);
        engine.tick();
        engine.apply(Command::TogglePause).unwrap();
        assert!(engine.session().is_paused);
        assert!(!engine.is_ticking());

        clock.advance(30_000);
        assert!(engine.tick().is_none());
        assert_eq!(engine.session().elapsed_seconds, 10.0);

        engine.apply(Command::TogglePause).unwrap();
        let report = engine.tick().unwrap();
        assert_eq!(report.elapsed_seconds, 40.0);
        assert!((report.earnings - 0.4).abs() < 1e-12);
    }

    #[test]
    fn zen_toggle_mirrors_location() {
        let (mut engine, _) = engine_with(MemoryStore::new(), Some("https://earntrack.app/?ref=x"));
        assert!(!engine.view().zen_mode);
        engine.apply(Command::ToggleZen).unwrap();
        assert_eq!(engine.location().url().as_str(), "https://earntrack.app/?ref=x&mode=zen");
        engine.toggle_zen().unwrap();
        assert_eq!(engine.location().url().as_str(), "https://earntrack.app/?ref=x");
        assert!(engine.set_zen_mode(false).is_none());
    }

    #[test]
    fn url_override_forces_calculator_zen_and_fresh_session() {
        let store = MemoryStore::with_entries([
            (keys::START_TIME, "1600000000000"),
            (keys::VIEW, "settings"),
            (keys::SETTINGS, r#"{"salary":5000,"currency":"USD"}"#),
        ]);
        let (engine, _) = engine_with(store, Some("https://earntrack.app/?salary=99999"));
        assert_eq!(engine.settings().salary, 99999.0);
        assert_eq!(engine.settings().currency, Currency::Usd);
        assert_eq!(engine.view().screen, Screen::Calculator);
        assert!(engine.view().zen_mode);
        assert_eq!(engine.session().start_instant, Some(T0));
        assert!(engine.location().zen_requested());
        // the link's settings become the stored settings
        let stored = engine.store().get(keys::SETTINGS).unwrap().unwrap();
        assert!(stored.contains("99999"));
    }

    #[test]
    fn stored_start_resumes_session() {
        let store = MemoryStore::with_entries([
            (keys::START_TIME, (T0 - 10_000).to_string()),
            (keys::VIEW, "calculator".to_string()),
        ]);
        let (mut engine, _) = engine_with(store, None);
        assert_eq!(engine.session_state(), SessionState::Running);
        assert_eq!(engine.view().screen, Screen::Calculator);
        assert_eq!(engine.tick().unwrap().elapsed_seconds, 10.0);
    }

    #[test]
    fn malformed_stored_values_fall_back() {
        let store = MemoryStore::with_entries([
            (keys::START_TIME, "yesterday"),
            (keys::SETTINGS, "{]"),
            (keys::THEME, "neon"),
        ]);
        let (engine, _) = engine_with(store, None);
        assert_eq!(engine.session_state(), SessionState::Idle);
        assert_eq!(engine.settings(), &Settings::default());
        assert_eq!(engine.view().theme, Theme::Dark);
    }

    #[test]
    fn settings_changes_persist_and_rerate() {
        let (mut engine, _) = fresh();
        let before = engine.rate();
        engine.edit_setting(SettingsField::Cycle, "annual").unwrap();
        assert_eq!(engine.settings().salary, 100_000.0);
        assert!(engine.rate() != before);

        engine.edit_setting(SettingsField::WorkHours, "30").unwrap();
        assert_eq!(engine.settings().work_hours, 30.0);
        assert!(engine.commit_work_hours().is_some());
        assert_eq!(engine.settings().work_hours, 8.0);
        assert!(engine.commit_work_hours().is_none());

        let stored = engine.store().get(keys::SETTINGS).unwrap().unwrap();
        let parsed: Settings = serde_json::from_str(&stored).unwrap();
        assert_eq!(&parsed, engine.settings());
    }

    #[test]
    fn theme_toggle_persists() {
        let (mut engine, _) = fresh();
        engine.toggle_theme();
        assert_eq!(engine.view().theme, Theme::Light);
        assert_eq!(engine.store().get(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn taps_only_count_on_calculator() {
        let (mut engine, clock) = fresh();
        assert!(engine.handle_input(RawInput::Press).is_none());
        assert_eq!(engine.input_deadline(), None);

        engine.start().unwrap();
        assert!(engine.handle_input(RawInput::Press).is_none());
        clock.advance(100);
        let event = engine.handle_input(RawInput::Press).unwrap();
        assert!(matches!(event, Event::SessionPaused { .. }));

        assert!(engine.handle_input(RawInput::Press).is_none());
        clock.advance(250);
        let event = engine.poll_input().unwrap();
        assert!(matches!(event, Event::ZenModeChanged { zen_mode: true, .. }));
    }

    #[test]
    fn swipe_quick_resets() {
        let (mut engine, clock) = fresh();
        engine.start().unwrap();
        clock.advance(5_000);
        let event = engine
            .handle_input(RawInput::DragRelease {
                offset_y: 180.0,
                velocity_y: 1_200.0,
            })
            .unwrap();
        assert!(matches!(event, Event::SessionReset { quick: true, .. }));
        assert_eq!(engine.session().start_instant, Some(T0 + 5_000));
    }

    #[derive(Default)]
    struct FakeClipboard {
        text: RefCell<Option<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<(), CoreError> {
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&self, _text: &str) -> Result<(), CoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into())
        }
    }

    #[test]
    fn failed_copy_shows_no_notice() {
        let (mut engine, _) = fresh();
        let err = engine.copy_share_link(&BrokenClipboard).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert!(!engine.copied_notice_visible());
    }

    #[test]
    fn copy_share_link_uses_zen_link() {
        let (mut engine, clock) = engine_with(MemoryStore::new(), Some("https://example.com/earn?mode=zen"));
        let clipboard = FakeClipboard::default();
        engine.copy_share_link(&clipboard).unwrap();
        assert_eq!(
            clipboard.text.borrow().as_deref(),
            Some("https://example.com/earn?salary=12000&cycle=monthly&workHours=8&workDaysPerWeek=5&currency=CNY&mode=zen")
        );
        assert!(engine.copied_notice_visible());
        clock.advance(2_000);
        assert!(!engine.copied_notice_visible());
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut engine, clock) = fresh();
        engine.start().unwrap();
        clock.advance(1_000);
        engine.tick();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                screen,
                elapsed_seconds,
                next_milestone,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(screen, Screen::Calculator);
                assert_eq!(elapsed_seconds, 1.0);
                assert_eq!(next_milestone, Some(1));
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
