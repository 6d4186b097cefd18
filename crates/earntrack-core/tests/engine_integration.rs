//! Integration tests for the engine over durable storage.
//!
//! Each "page load" opens the same SQLite file with a fresh engine, so these
//! tests cover what survives a reload.

use std::path::Path;

use earntrack_core::storage::keys;
use earntrack_core::{
    Command, Config, Cycle, Database, Engine, EngineOptions, Event, KeyValueStore, Location,
    ManualClock, Screen, SessionState, SettingsField, Theme,
};

const T0: u64 = 1_700_000_000_000;

fn load(path: &Path, clock: &ManualClock, url: Option<&str>) -> Engine<Database, ManualClock> {
    let store = Database::open_at(path).unwrap();
    let location = url.map(|u| Location::parse(u).unwrap());
    let options = EngineOptions::from_config(&Config::default()).unwrap();
    Engine::load(store, clock.clone(), location, options)
}

#[test]
fn running_session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("earntrack.db");
    let clock = ManualClock::new(T0);

    {
        let mut engine = load(&path, &clock, None);
        engine.edit_setting(SettingsField::Cycle, "hourly").unwrap();
        engine.edit_setting(SettingsField::Salary, "36").unwrap();
        engine.toggle_theme();
        engine.start().unwrap();
    }

    clock.advance(90_000);
    let mut engine = load(&path, &clock, None);
    assert_eq!(engine.session_state(), SessionState::Running);
    assert_eq!(engine.view().screen, Screen::Calculator);
    assert_eq!(engine.view().theme, Theme::Light);
    assert_eq!(engine.settings().cycle, Cycle::Hourly);
    assert_eq!(engine.settings().salary, 36.0);

    let report = engine.tick().unwrap();
    assert_eq!(report.elapsed_seconds, 90.0);
    assert!((report.earnings - 0.9).abs() < 1e-9);
}

#[test]
fn full_reset_is_not_resumed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("earntrack.db");
    let clock = ManualClock::new(T0);

    {
        let mut engine = load(&path, &clock, None);
        engine.start().unwrap();
        clock.advance(5_000);
        engine.reset(false);
    }

    let engine = load(&path, &clock, None);
    assert_eq!(engine.session_state(), SessionState::Idle);
    assert_eq!(engine.view().screen, Screen::Settings);
}

#[test]
fn quick_reset_moves_the_stored_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("earntrack.db");
    let clock = ManualClock::new(T0);

    {
        let mut engine = load(&path, &clock, None);
        engine.start().unwrap();
        clock.advance(60_000);
        engine.apply(Command::QuickReset).unwrap();
    }

    clock.advance(2_000);
    let mut engine = load(&path, &clock, None);
    assert_eq!(engine.session().start_instant, Some(T0 + 60_000));
    assert_eq!(engine.tick().unwrap().elapsed_seconds, 2.0);
}

#[test]
fn shared_link_opens_in_zen_and_rewrites_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("earntrack.db");
    let clock = ManualClock::new(T0);

    let link = {
        let mut engine = load(&path, &clock, None);
        engine.edit_setting(SettingsField::Currency, "EUR").unwrap();
        engine.share_link()
    };

    let other = dir.path().join("other.db");
    let engine = load(&other, &clock, Some(&link));
    assert!(engine.view().zen_mode);
    assert_eq!(engine.view().screen, Screen::Calculator);
    assert_eq!(engine.session_state(), SessionState::Running);
    assert_eq!(engine.settings().currency, earntrack_core::Currency::Eur);

    let stored = engine.store().get(keys::SETTINGS).unwrap().unwrap();
    assert!(stored.contains("\"currency\":\"EUR\""));
    // the link session is not written back as a resumable start
    assert!(engine.store().get(keys::START_TIME).unwrap().is_none());
}

#[test]
fn milestone_after_reload_fires_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("earntrack.db");
    let clock = ManualClock::new(T0);

    {
        let mut engine = load(&path, &clock, None);
        engine.edit_setting(SettingsField::Cycle, "hourly").unwrap();
        engine.edit_setting(SettingsField::Salary, "3600").unwrap();
        engine.start().unwrap();
        clock.advance(1_000);
        let report = engine.tick().unwrap();
        assert!(matches!(report.milestone, Some(Event::MilestoneReached { threshold: 1, .. })));
    }

    clock.advance(1_000);
    let mut engine = load(&path, &clock, None);
    let report = engine.tick().unwrap();
    assert!(matches!(report.milestone, Some(Event::MilestoneReached { threshold: 1, .. })));
}
