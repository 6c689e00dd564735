//! User-tunable timer settings.
//!
//! Out-of-range values are never rejected: every bound is clamped at the
//! edge, so any `Settings` that reaches the engine is already valid.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

use super::session::SessionKind;

pub const FOCUS_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const SHORT_BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const SESSIONS_BEFORE_LONG_BREAK_RANGE: RangeInclusive<u32> = 2..=8;

/// Timer configuration, serialized with the same camelCase keys the settings
/// blob is persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_focus_minutes", deserialize_with = "saturating_u32")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes", deserialize_with = "saturating_u32")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes", deserialize_with = "saturating_u32")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break", deserialize_with = "saturating_u32")]
    pub sessions_before_long_break: u32,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start: false,
            sound_enabled: true,
        }
    }
}

/// Pin any signed integer into `u32`; negatives become 0.
pub(crate) fn saturate_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Accept any integer for a numeric field so out-of-range values reach
/// [`Settings::clamped`] instead of failing the whole record.
fn saturating_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    i64::deserialize(deserializer).map(saturate_u32)
}

fn clamp(value: u32, range: RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl Settings {
    /// Return a copy with every numeric field clamped into its allowed range.
    pub fn clamped(self) -> Self {
        Self {
            focus_minutes: clamp(self.focus_minutes, FOCUS_MINUTES_RANGE),
            short_break_minutes: clamp(self.short_break_minutes, SHORT_BREAK_MINUTES_RANGE),
            long_break_minutes: clamp(self.long_break_minutes, LONG_BREAK_MINUTES_RANGE),
            sessions_before_long_break: clamp(
                self.sessions_before_long_break,
                SESSIONS_BEFORE_LONG_BREAK_RANGE,
            ),
            ..self
        }
    }

    pub fn minutes(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Focus => self.focus_minutes,
            SessionKind::ShortBreak => self.short_break_minutes,
            SessionKind::LongBreak => self.long_break_minutes,
        }
    }

    /// Session duration in whole seconds.
    pub fn duration_secs(&self, kind: SessionKind) -> u32 {
        self.minutes(kind).saturating_mul(60)
    }

    /// The break that follows the `completed_focus_count`-th focus session.
    pub fn break_after(&self, completed_focus_count: u32) -> SessionKind {
        // Guard the modulus even though clamping keeps this >= 2.
        let every = self.sessions_before_long_break.max(1);
        if completed_focus_count % every == 0 {
            SessionKind::LongBreak
        } else {
            SessionKind::ShortBreak
        }
    }
}
