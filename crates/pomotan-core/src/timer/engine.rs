//! Session engine implementation.
//!
//! The engine is a tick-driven state machine. It holds no timer handle of its
//! own: the host calls [`SessionEngine::on_clock`] once per second while
//! [`SessionEngine::clock_demand`] is not [`ClockDemand::Idle`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --expiry (auto-start off)--> Idle (next session)
//!                    |
//!                    +--expiry (auto-start on)--> AutoStartCountdown --0--> Running (next session)
//!
//! any --reset | reset_all | change_session | apply_settings--> Idle
//! ```
//!
//! When auto-start is on, the switch to the next session is deferred: at expiry
//! the finished session stays current with zero time left and the next kind is
//! parked in `pending_next_session` until the countdown completes.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(Settings::default());
//! engine.start();
//! // Once per second, while engine.clock_demand() != ClockDemand::Idle:
//! for event in engine.on_clock() { /* render sounds, toasts */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::ClockDemand;
use super::session::SessionKind;
use super::settings::Settings;
use crate::events::{Event, SoundCue};

/// Seconds of grace before an auto-started session begins.
pub const AUTOSTART_COUNTDOWN_SECS: u8 = 3;

pub const FOCUS_COMPLETE_TOAST: &str = "Focus session complete";
pub const BREAK_COMPLETE_TOAST: &str = "Break complete";

/// Read-only view of the engine, handed to presentation collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_session: SessionKind,
    pub time_left_secs: u32,
    /// Full length of the current session, for progress rendering.
    pub session_duration_secs: u32,
    pub is_running: bool,
    pub completed_focus_count: u32,
    pub autostart_countdown: Option<u8>,
    pub pending_next_session: Option<SessionKind>,
    pub show_colon: bool,
}

/// Core session engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEngine {
    settings: Settings,
    current_session: SessionKind,
    time_left_secs: u32,
    is_running: bool,
    completed_focus_count: u32,
    #[serde(default)]
    autostart_countdown: Option<u8>,
    #[serde(default)]
    pending_next_session: Option<SessionKind>,
    #[serde(default = "default_show_colon")]
    show_colon: bool,
}

fn default_show_colon() -> bool {
    true
}

impl SessionEngine {
    /// Create an idle engine positioned at a full focus session.
    pub fn new(settings: Settings) -> Self {
        Self::with_session(settings, SessionKind::Focus)
    }

    /// Create an idle engine positioned at a full session of `session`.
    pub fn with_session(settings: Settings, session: SessionKind) -> Self {
        let settings = settings.clamped();
        Self {
            settings,
            current_session: session,
            time_left_secs: settings.duration_secs(session),
            is_running: false,
            completed_focus_count: 0,
            autostart_countdown: None,
            pending_next_session: None,
            show_colon: true,
        }
    }

    /// Repair a deserialized engine so every invariant holds again.
    ///
    /// Settings are clamped, the remaining time is pinned to the current
    /// session, and a half-recorded countdown (countdown without a pending
    /// session or vice versa) is dropped.
    pub fn sanitized(mut self) -> Self {
        self.settings = self.settings.clamped();
        self.time_left_secs = self.time_left_secs.min(self.session_duration_secs());
        match (self.autostart_countdown, self.pending_next_session) {
            (Some(n), Some(_)) if n > 0 => self.is_running = false,
            (None, None) => {}
            _ => {
                self.autostart_countdown = None;
                self.pending_next_session = None;
            }
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_session(&self) -> SessionKind {
        self.current_session
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn autostart_countdown(&self) -> Option<u8> {
        self.autostart_countdown
    }

    pub fn pending_next_session(&self) -> Option<SessionKind> {
        self.pending_next_session
    }

    pub fn show_colon(&self) -> bool {
        self.show_colon
    }

    pub fn session_duration_secs(&self) -> u32 {
        self.settings.duration_secs(self.current_session)
    }

    /// Which clock the host should be driving right now.
    pub fn clock_demand(&self) -> ClockDemand {
        if self.is_running {
            ClockDemand::Tick
        } else if self.autostart_countdown.is_some() {
            ClockDemand::Countdown
        } else {
            ClockDemand::Idle
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_session: self.current_session,
            time_left_secs: self.time_left_secs,
            session_duration_secs: self.session_duration_secs(),
            is_running: self.is_running,
            completed_focus_count: self.completed_focus_count,
            autostart_countdown: self.autostart_countdown,
            pending_next_session: self.pending_next_session,
            show_colon: self.show_colon,
        }
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Deliver one one-second clock pulse to whichever timer is active.
    pub fn on_clock(&mut self) -> Vec<Event> {
        match self.clock_demand() {
            ClockDemand::Tick => self.tick(),
            ClockDemand::Countdown => self.advance_autostart_countdown(),
            ClockDemand::Idle => Vec::new(),
        }
    }

    /// Advance the running session by one second.
    ///
    /// No-op unless running. On expiry the session-end transition runs and
    /// its events are returned.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running {
            return Vec::new();
        }
        self.show_colon = !self.show_colon;
        if self.time_left_secs > 1 {
            self.time_left_secs -= 1;
            return Vec::new();
        }
        self.is_running = false;
        self.time_left_secs = 0;
        self.on_session_end()
    }

    /// Advance the auto-start countdown by one second.
    ///
    /// When it reaches zero the pending session is committed and started.
    pub fn advance_autostart_countdown(&mut self) -> Vec<Event> {
        let Some(remaining) = self.autostart_countdown else {
            return Vec::new();
        };
        let remaining = remaining.saturating_sub(1);
        let next = self.pending_next_session.unwrap_or(self.current_session);
        if remaining > 0 {
            self.autostart_countdown = Some(remaining);
            return vec![Event::AutoStartCountdown {
                next,
                remaining,
                at: Utc::now(),
            }];
        }

        self.autostart_countdown = None;
        self.pending_next_session = None;
        self.commit(next);
        self.is_running = true;
        info!(session = %next, "auto-start countdown finished");
        vec![Event::AutoStartCommitted {
            session: next,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        }]
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or resume) the current session.
    ///
    /// Ignored while an auto-start countdown is pending and when already
    /// running.
    pub fn start(&mut self) -> Option<Event> {
        if self.autostart_countdown.is_some() {
            debug!("start ignored: auto-start countdown in progress");
            return None;
        }
        if self.is_running {
            return None;
        }
        self.is_running = true;
        debug!(session = %self.current_session, time_left = self.time_left_secs, "started");
        Some(Event::SessionStarted {
            session: self.current_session,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Pause the running session. Leaves a pending auto-start countdown alone.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        debug!(session = %self.current_session, time_left = self.time_left_secs, "paused");
        Some(Event::SessionPaused {
            session: self.current_session,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current session. The focus counter is kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.cancel_autostart();
        self.is_running = false;
        self.time_left_secs = self.session_duration_secs();
        self.show_colon = true;
        debug!(session = %self.current_session, "reset");
        Some(Event::SessionReset {
            session: self.current_session,
            at: Utc::now(),
        })
    }

    /// `reset` plus clearing the completed focus counter.
    pub fn reset_all(&mut self) -> Option<Event> {
        self.reset();
        self.completed_focus_count = 0;
        debug!("reset all");
        Some(Event::AllReset {
            session: self.current_session,
            at: Utc::now(),
        })
    }

    /// Manually switch to `kind`. Always allowed; always stops the timer.
    pub fn change_session(&mut self, kind: SessionKind) -> Option<Event> {
        let from = self.current_session;
        self.autostart_countdown = None;
        self.pending_next_session = None;
        self.current_session = kind;
        self.is_running = false;
        self.time_left_secs = self.session_duration_secs();
        self.show_colon = true;
        debug!(%from, to = %kind, "session changed");
        Some(Event::SessionChanged {
            from,
            to: kind,
            at: Utc::now(),
        })
    }

    /// Replace the settings wholesale.
    ///
    /// Stops the timer. If the current session's duration changed the
    /// remaining time is refilled to the new duration; otherwise it is kept.
    pub fn apply_settings(&mut self, settings: Settings) -> Option<Event> {
        let settings = settings.clamped();
        self.cancel_autostart();
        let old_duration = self.session_duration_secs();
        self.settings = settings;
        let new_duration = self.session_duration_secs();
        self.time_left_secs = if new_duration != old_duration {
            new_duration
        } else {
            self.time_left_secs.min(new_duration)
        };
        self.is_running = false;
        debug!(?settings, time_left = self.time_left_secs, "settings applied");
        Some(Event::SettingsApplied {
            settings,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_session_end(&mut self) -> Vec<Event> {
        let finished = self.current_session;
        let (next, cue, message) = if finished.is_break() {
            (SessionKind::Focus, SoundCue::BreakEnd, BREAK_COMPLETE_TOAST)
        } else {
            self.completed_focus_count = self.completed_focus_count.saturating_add(1);
            (
                self.settings.break_after(self.completed_focus_count),
                SoundCue::FocusEnd,
                FOCUS_COMPLETE_TOAST,
            )
        };
        info!(
            session = %finished,
            %next,
            completed_focus_count = self.completed_focus_count,
            "session complete"
        );

        let now = Utc::now();
        let mut events = vec![Event::SessionCompleted {
            session: finished,
            next,
            completed_focus_count: self.completed_focus_count,
            at: now,
        }];
        if self.settings.sound_enabled {
            events.push(Event::Sound { cue, at: now });
        }
        events.push(Event::Toast {
            message: message.to_string(),
            at: now,
        });

        if self.settings.auto_start {
            self.pending_next_session = Some(next);
            self.autostart_countdown = Some(AUTOSTART_COUNTDOWN_SECS);
            events.push(Event::AutoStartScheduled {
                next,
                countdown: AUTOSTART_COUNTDOWN_SECS,
                at: now,
            });
        } else {
            self.commit(next);
        }
        events
    }

    /// Drop a pending auto-start, moving to the queued session without
    /// starting it.
    fn cancel_autostart(&mut self) {
        self.autostart_countdown = None;
        if let Some(next) = self.pending_next_session.take() {
            debug!(%next, "auto-start cancelled");
            self.commit(next);
        }
    }

    fn commit(&mut self, session: SessionKind) {
        self.current_session = session;
        self.time_left_secs = self.settings.duration_secs(session);
    }
}
