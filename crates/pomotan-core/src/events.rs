use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionKind, Settings};

/// Audio cue identifiers. The audio collaborator resolves these to assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundCue {
    FocusEnd,
    BreakEnd,
}

impl SoundCue {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundCue::FocusEnd => "focus-end",
            SoundCue::BreakEnd => "break-end",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every state change of the engine produces an Event.
/// Presentation collaborators render `Sound` and `Toast`; the rest are
/// informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session: SessionKind,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        session: SessionKind,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        session: SessionKind,
        at: DateTime<Utc>,
    },
    /// `reset-all`: the session was reset and the focus counter cleared.
    AllReset {
        session: SessionKind,
        at: DateTime<Utc>,
    },
    SessionChanged {
        from: SessionKind,
        to: SessionKind,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: Settings,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session: SessionKind,
        next: SessionKind,
        completed_focus_count: u32,
        at: DateTime<Utc>,
    },
    Sound {
        cue: SoundCue,
        at: DateTime<Utc>,
    },
    Toast {
        message: String,
        at: DateTime<Utc>,
    },
    AutoStartScheduled {
        next: SessionKind,
        countdown: u8,
        at: DateTime<Utc>,
    },
    AutoStartCountdown {
        next: SessionKind,
        remaining: u8,
        at: DateTime<Utc>,
    },
    AutoStartCommitted {
        session: SessionKind,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
}
