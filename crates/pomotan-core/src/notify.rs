//! Notification sinks for engine output.
//!
//! The engine only emits [`Event::Sound`] and [`Event::Toast`]; turning them
//! into audio or on-screen messages is up to a [`Notifier`]. Sink failures
//! are logged and dropped, never reported back into the engine.

use std::io::{self, Write};

use tracing::warn;

use crate::events::{Event, SoundCue};

/// Error raised by a notification sink.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("sound playback failed: {0}")]
    Playback(String),
    #[error("notification display failed: {0}")]
    Display(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub trait Notifier {
    fn play(&mut self, cue: SoundCue) -> Result<(), NotifyError>;
    fn toast(&mut self, message: &str) -> Result<(), NotifyError>;
}

/// Route presentation events to `notifier`. Other events are ignored.
///
/// Returns how many events were delivered successfully.
pub fn dispatch<N: Notifier + ?Sized>(notifier: &mut N, events: &[Event]) -> usize {
    let mut delivered = 0;
    for event in events {
        let result = match event {
            Event::Sound { cue, .. } => notifier.play(*cue),
            Event::Toast { message, .. } => notifier.toast(message),
            _ => continue,
        };
        match result {
            Ok(()) => delivered += 1,
            Err(e) => warn!(error = %e, "notification dropped"),
        }
    }
    delivered
}

/// Rings the terminal bell for sounds and prints toasts on a line of their
/// own.
pub struct TerminalNotifier<W: Write> {
    out: W,
}

impl TerminalNotifier<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn play(&mut self, _cue: SoundCue) -> Result<(), NotifyError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }

    fn toast(&mut self, message: &str) -> Result<(), NotifyError> {
        writeln!(self.out, "\n>> {message}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundCue>,
        toasts: Vec<String>,
        fail_sounds: bool,
    }

    impl Notifier for Recorder {
        fn play(&mut self, cue: SoundCue) -> Result<(), NotifyError> {
            if self.fail_sounds {
                return Err(NotifyError::Playback("autoplay blocked".into()));
            }
            self.sounds.push(cue);
            Ok(())
        }

        fn toast(&mut self, message: &str) -> Result<(), NotifyError> {
            self.toasts.push(message.to_string());
            Ok(())
        }
    }

    fn sample() -> Vec<Event> {
        let at = Utc::now();
        vec![
            Event::Sound {
                cue: SoundCue::BreakEnd,
                at,
            },
            Event::Toast {
                message: "Break complete".into(),
                at,
            },
            Event::SessionReset {
                session: crate::timer::SessionKind::Focus,
                at,
            },
        ]
    }

    #[test]
    fn dispatch_routes_sounds_and_toasts() {
        let mut recorder = Recorder::default();
        assert_eq!(dispatch(&mut recorder, &sample()), 2);
        assert_eq!(recorder.sounds, vec![SoundCue::BreakEnd]);
        assert_eq!(recorder.toasts, vec!["Break complete".to_string()]);
    }

    #[test]
    fn failing_sink_is_swallowed() {
        let mut recorder = Recorder {
            fail_sounds: true,
            ..Recorder::default()
        };
        assert_eq!(dispatch(&mut recorder, &sample()), 1);
        assert_eq!(recorder.toasts.len(), 1);
    }

    #[test]
    fn terminal_notifier_writes_bell_and_message() {
        let mut notifier = TerminalNotifier::new(Vec::new());
        dispatch(&mut notifier, &sample());
        let out = String::from_utf8(notifier.into_inner()).unwrap();
        assert!(out.starts_with('\x07'));
        assert!(out.contains(">> Break complete"));
    }
}
