//! Derived presentation values.
//!
//! Nothing here is engine state: every function is a pure projection of a
//! [`Snapshot`], so any number of displays (window title, mirrored mini
//! window, terminal status line) can render the same engine.

use crate::timer::{SessionKind, Snapshot};

/// Title shown while the timer is idle.
pub const IDLE_TITLE: &str = "Pomotan";

/// Format whole seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Window title: `MM:SS | Focus` while running, a static label otherwise.
pub fn document_title(snapshot: &Snapshot) -> String {
    if snapshot.is_running {
        format!(
            "{} | {}",
            format_clock(snapshot.time_left_secs),
            snapshot.current_session.label()
        )
    } else {
        IDLE_TITLE.to_string()
    }
}

/// Heading above the clock.
pub fn session_heading(snapshot: &Snapshot) -> String {
    if let (Some(remaining), Some(next)) =
        (snapshot.autostart_countdown, snapshot.pending_next_session)
    {
        let name = match next {
            SessionKind::Focus => "Focus session",
            SessionKind::ShortBreak => "Short break",
            SessionKind::LongBreak => "Long break",
        };
        return format!("{name} starts in {remaining}...");
    }
    match snapshot.current_session {
        SessionKind::Focus => "Let's focus together~".to_string(),
        SessionKind::ShortBreak => "Time for a lil' break".to_string(),
        SessionKind::LongBreak => "Take a longer rest".to_string(),
    }
}

/// Fraction of the current session already elapsed, in `[0, 1]`.
pub fn progress(snapshot: &Snapshot) -> f64 {
    if snapshot.session_duration_secs == 0 {
        return 0.0;
    }
    let left = f64::from(snapshot.time_left_secs) / f64::from(snapshot.session_duration_secs);
    (1.0 - left).clamp(0.0, 1.0)
}

/// One marker per focus session in the current long-break cycle; `true`
/// marks a completed one.
pub fn session_dots(completed_focus_count: u32, sessions_before_long_break: u32) -> Vec<bool> {
    let total = sessions_before_long_break.max(1);
    let filled = completed_focus_count % total;
    (0..total).map(|i| i < filled).collect()
}

/// Text rendering of [`session_dots`], e.g. `●●○○`.
pub fn render_dots(dots: &[bool]) -> String {
    dots.iter().map(|&done| if done { '●' } else { '○' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{SessionEngine, Settings};

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn title_shows_clock_only_while_running() {
        let mut engine = SessionEngine::new(Settings::default());
        assert_eq!(document_title(&engine.snapshot()), IDLE_TITLE);
        engine.start();
        engine.tick();
        assert_eq!(document_title(&engine.snapshot()), "24:59 | Focus");
        engine.change_session(SessionKind::ShortBreak);
        engine.start();
        assert_eq!(document_title(&engine.snapshot()), "05:00 | Short Break");
    }

    #[test]
    fn heading_announces_autostart_countdown() {
        let settings = Settings {
            focus_minutes: 1,
            auto_start: true,
            ..Settings::default()
        };
        let mut engine = SessionEngine::new(settings);
        assert_eq!(session_heading(&engine.snapshot()), "Let's focus together~");
        engine.start();
        while engine.is_running() {
            engine.tick();
        }
        assert_eq!(
            session_heading(&engine.snapshot()),
            "Short break starts in 3..."
        );
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let mut engine = SessionEngine::new(Settings::default());
        assert_eq!(progress(&engine.snapshot()), 0.0);
        engine.start();
        for _ in 0..750 {
            engine.tick();
        }
        assert!((progress(&engine.snapshot()) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn dots_wrap_each_cycle() {
        assert_eq!(session_dots(0, 4), vec![false; 4]);
        assert_eq!(session_dots(2, 4), vec![true, true, false, false]);
        assert_eq!(session_dots(4, 4), vec![false; 4]);
        assert_eq!(render_dots(&session_dots(5, 4)), "●○○○");
    }
}
