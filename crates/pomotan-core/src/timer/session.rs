use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three kinds of interval the engine alternates between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Focus,
        SessionKind::ShortBreak,
        SessionKind::LongBreak,
    ];

    /// Tag used for persistence (`"focus"`, `"shortBreak"`, `"longBreak"`).
    pub fn as_tag(self) -> &'static str {
        match self {
            SessionKind::Focus => "focus",
            SessionKind::ShortBreak => "shortBreak",
            SessionKind::LongBreak => "longBreak",
        }
    }

    /// Human readable label, as shown in the window title.
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, SessionKind::Focus)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Error returned when a session tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown session kind: {0}")]
pub struct UnknownSessionKind(pub String);

impl FromStr for SessionKind {
    type Err = UnknownSessionKind;

    /// Accepts the persisted tags plus a few short aliases used by the CLI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" | "f" => Ok(SessionKind::Focus),
            "shortBreak" | "short-break" | "short" | "sb" => Ok(SessionKind::ShortBreak),
            "longBreak" | "long-break" | "long" | "lb" => Ok(SessionKind::LongBreak),
            other => Err(UnknownSessionKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip_through_from_str() {
        for kind in SessionKind::ALL {
            assert_eq!(kind.as_tag().parse::<SessionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_persisted_tags() {
        let json = serde_json::to_string(&SessionKind::ShortBreak).unwrap();
        assert_eq!(json, "\"shortBreak\"");
        let kind: SessionKind = serde_json::from_str("\"longBreak\"").unwrap();
        assert_eq!(kind, SessionKind::LongBreak);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!("nap".parse::<SessionKind>().is_err());
    }

    #[test]
    fn only_focus_is_not_a_break() {
        assert!(!SessionKind::Focus.is_break());
        assert!(SessionKind::ShortBreak.is_break());
        assert!(SessionKind::LongBreak.is_break());
    }
}
