//! Integration tests for the session engine.
//!
//! Drives full Pomodoro cycles through the public API, persisting between
//! steps the way a one-shot host would.

use pomotan_core::notify::{dispatch, Notifier, NotifyError};
use pomotan_core::storage::Database;
use pomotan_core::view;
use pomotan_core::{Event, SessionEngine, SessionKind, Settings, SoundCue, Store};
use tempfile::TempDir;

fn one_minute_settings(auto_start: bool) -> Settings {
    Settings {
        focus_minutes: 1,
        short_break_minutes: 1,
        long_break_minutes: 1,
        sessions_before_long_break: 2,
        auto_start,
        sound_enabled: true,
    }
}

fn pulse(engine: &mut SessionEngine, n: usize) -> Vec<Event> {
    (0..n).flat_map(|_| engine.on_clock()).collect()
}

#[derive(Default)]
struct Collect {
    cues: Vec<SoundCue>,
    toasts: Vec<String>,
}

impl Notifier for Collect {
    fn play(&mut self, cue: SoundCue) -> Result<(), NotifyError> {
        self.cues.push(cue);
        Ok(())
    }

    fn toast(&mut self, message: &str) -> Result<(), NotifyError> {
        self.toasts.push(message.to_string());
        Ok(())
    }
}

#[test]
fn test_full_cycle_without_autostart() {
    let mut engine = SessionEngine::new(one_minute_settings(false));
    let mut sink = Collect::default();

    // Focus 1 -> short break
    engine.start();
    dispatch(&mut sink, &pulse(&mut engine, 60));
    assert_eq!(engine.completed_focus_count(), 1);
    assert_eq!(engine.current_session(), SessionKind::ShortBreak);
    assert_eq!(engine.time_left_secs(), 60);
    assert!(!engine.is_running());

    // Short break -> focus
    engine.start();
    dispatch(&mut sink, &pulse(&mut engine, 60));
    assert_eq!(engine.current_session(), SessionKind::Focus);
    assert_eq!(engine.completed_focus_count(), 1);

    // Focus 2 -> long break, since 2 % 2 == 0
    engine.start();
    dispatch(&mut sink, &pulse(&mut engine, 60));
    assert_eq!(engine.completed_focus_count(), 2);
    assert_eq!(engine.current_session(), SessionKind::LongBreak);

    assert_eq!(
        sink.cues,
        vec![SoundCue::FocusEnd, SoundCue::BreakEnd, SoundCue::FocusEnd]
    );
    assert_eq!(sink.toasts.len(), 3);
}

#[test]
fn test_autostart_cycle_runs_hands_free() {
    let mut engine = SessionEngine::new(one_minute_settings(true));
    engine.start();

    pulse(&mut engine, 60);
    assert_eq!(engine.autostart_countdown(), Some(3));
    assert_eq!(
        view::session_heading(&engine.snapshot()),
        "Short break starts in 3..."
    );

    pulse(&mut engine, 3);
    assert!(engine.is_running());
    assert_eq!(engine.current_session(), SessionKind::ShortBreak);

    // Break runs out and focus auto-starts again.
    pulse(&mut engine, 60 + 3);
    assert!(engine.is_running());
    assert_eq!(engine.current_session(), SessionKind::Focus);
    assert_eq!(engine.completed_focus_count(), 1);
}

#[test]
fn test_apply_settings_mid_countdown_commits_next_session() {
    let mut engine = SessionEngine::new(one_minute_settings(true));
    engine.start();
    pulse(&mut engine, 61);
    assert_eq!(engine.autostart_countdown(), Some(2));

    engine.apply_settings(Settings {
        short_break_minutes: 3,
        ..one_minute_settings(true)
    });
    assert_eq!(engine.autostart_countdown(), None);
    assert_eq!(engine.current_session(), SessionKind::ShortBreak);
    assert_eq!(engine.time_left_secs(), 180);
    assert!(!engine.is_running());
}

#[test]
fn test_state_survives_restart_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pomotan.db");

    {
        let store = Store::new(Database::open_at(&path).unwrap());
        store.save_settings(&one_minute_settings(false)).unwrap();
        let mut engine = store.load_engine();
        engine.start();
        pulse(&mut engine, 60);
        store.save_engine(&engine).unwrap();
    }

    let store = Store::new(Database::open_at(&path).unwrap());
    let engine = store.load_engine();
    assert_eq!(engine.current_session(), SessionKind::ShortBreak);
    assert_eq!(engine.completed_focus_count(), 1);
    assert_eq!(store.load_session_kind(), SessionKind::ShortBreak);
}
