//! # Pomotan Core Library
//!
//! Session engine for the Pomotan Pomodoro timer: alternating focus and
//! break intervals with configurable durations, automatic long-break
//! placement and an optional auto-start countdown between sessions.
//!
//! ## Architecture
//!
//! - **Session Engine**: a tick-driven state machine. The host pulses it once
//!   per second while it asks for a clock; it never owns a timer itself.
//! - **Events**: every transition yields [`Event`]s; sound cues and toasts are
//!   rendered by a [`notify::Notifier`].
//! - **Storage**: SQLite kv table holding the settings blob, the last session
//!   kind and the engine record.
//! - **View**: pure formatting helpers (title, heading, progress, dots).
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: core state machine
//! - [`ClockDriver`]: tokio clock honoring the engine's clock demand
//! - [`Store`]: persisted settings and session state
//! - [`Settings`]: clamped timer configuration

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;
pub mod view;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{Event, SoundCue};
pub use storage::{Database, Store};
pub use timer::{
    ClockDemand, ClockDriver, SessionEngine, SessionKind, Settings, SharedEngine, Snapshot,
};
