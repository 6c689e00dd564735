mod clock;
mod engine;
mod session;
mod settings;

pub use clock::{lock, shared, ClockDemand, ClockDriver, SharedEngine, CLOCK_PERIOD};
pub use engine::{
    SessionEngine, Snapshot, AUTOSTART_COUNTDOWN_SECS, BREAK_COMPLETE_TOAST, FOCUS_COMPLETE_TOAST,
};
pub use session::{SessionKind, UnknownSessionKind};
pub use settings::{
    Settings, FOCUS_MINUTES_RANGE, LONG_BREAK_MINUTES_RANGE, SESSIONS_BEFORE_LONG_BREAK_RANGE,
    SHORT_BREAK_MINUTES_RANGE,
};
