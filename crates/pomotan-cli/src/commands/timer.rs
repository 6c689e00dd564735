use std::sync::Arc;

use clap::Subcommand;
use pomotan_core::notify::{dispatch, TerminalNotifier};
use pomotan_core::timer::{lock, shared, CLOCK_PERIOD};
use pomotan_core::view;
use pomotan_core::{ClockDemand, ClockDriver, Event, SessionEngine, SessionKind, Snapshot, Store};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::debug;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start or resume the current session
    Start,
    /// Pause the current session
    Pause,
    /// Refill the current session and stop
    Reset,
    /// Reset and clear the completed focus counter
    ResetAll,
    /// Deliver clock pulses (one per second of timer time)
    Tick {
        /// Number of pulses
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Switch session kind (focus, shortBreak, longBreak)
    Session {
        /// Session kind
        kind: SessionKind,
    },
    /// Run the timer in the foreground, reading commands from stdin
    Run {
        /// Start the current session immediately
        #[arg(long)]
        start: bool,
    },
}

#[derive(Serialize)]
struct Report {
    snapshot: Snapshot,
    title: String,
    heading: String,
    events: Vec<Event>,
}

fn report(engine: &SessionEngine, events: Vec<Event>) -> Report {
    let snapshot = engine.snapshot();
    Report {
        title: view::document_title(&snapshot),
        heading: view::session_heading(&snapshot),
        snapshot,
        events,
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let mut engine = store.load_engine();

    let events: Vec<Event> = match action {
        TimerAction::Status => Vec::new(),
        TimerAction::Start => engine.start().into_iter().collect(),
        TimerAction::Pause => engine.pause().into_iter().collect(),
        TimerAction::Reset => engine.reset().into_iter().collect(),
        TimerAction::ResetAll => engine.reset_all().into_iter().collect(),
        TimerAction::Session { kind } => engine.change_session(kind).into_iter().collect(),
        TimerAction::Tick { count } => (0..count).flat_map(|_| engine.on_clock()).collect(),
        TimerAction::Run { start } => return run_foreground(store, engine, start),
    };

    dispatch(&mut TerminalNotifier::stderr(), &events);
    println!("{}", serde_json::to_string_pretty(&report(&engine, events))?);
    store.save_engine(&engine)?;
    Ok(())
}

/// One line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Reset,
    ResetAll,
    Session(SessionKind),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line {
        "s" | "start" => Some(Input::Start),
        "p" | "pause" => Some(Input::Pause),
        "r" | "reset" => Some(Input::Reset),
        "R" | "reset-all" => Some(Input::ResetAll),
        "q" | "quit" => Some(Input::Quit),
        other => other.parse().ok().map(Input::Session),
    }
}

fn apply_input(engine: &mut SessionEngine, input: Input) -> Option<Event> {
    match input {
        Input::Start => engine.start(),
        Input::Pause => engine.pause(),
        Input::Reset => engine.reset(),
        Input::ResetAll => engine.reset_all(),
        Input::Session(kind) => engine.change_session(kind),
        Input::Quit => None,
    }
}

fn status_line(engine: &SessionEngine) -> String {
    let snapshot = engine.snapshot();
    let clock = view::format_clock(snapshot.time_left_secs);
    let dots = view::render_dots(&view::session_dots(
        snapshot.completed_focus_count,
        engine.settings().sessions_before_long_break,
    ));
    format!(
        "{clock}  {}  {dots}  [{}]",
        view::session_heading(&snapshot),
        view::document_title(&snapshot)
    )
}

/// Status refresh clock. The first tick is one period out, since the caller
/// has just printed a status line.
fn refresh_interval() -> time::Interval {
    time::interval_at(Instant::now() + CLOCK_PERIOD, CLOCK_PERIOD)
}

const HELP: &str = "commands: s=start p=pause r=reset R=reset-all f|sb|lb=switch session q=quit";

fn run_foreground(
    store: Store,
    engine: SessionEngine,
    start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(foreground(store, engine, start))
}

async fn foreground(
    store: Store,
    mut engine: SessionEngine,
    start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if start {
        engine.start();
    }
    let engine = shared(engine);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = ClockDriver::new(Arc::clone(&engine), tx);
    let wake = driver.waker();
    let clock = tokio::spawn(driver.run());

    let mut notifier = TerminalNotifier::stderr();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("{HELP}");
    println!("{}", status_line(&lock(&engine)));
    let mut refresh = refresh_interval();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(input) = parse_input(line.trim()) else {
                    eprintln!("{HELP}");
                    continue;
                };
                if input == Input::Quit {
                    break;
                }
                let event = apply_input(&mut lock(&engine), input);
                debug!(?input, ?event, "command applied");
                wake.notify_one();
                store.save_engine(&lock(&engine))?;
                println!("{}", status_line(&lock(&engine)));
            }
            Some(event) = rx.recv() => {
                dispatch(&mut notifier, std::slice::from_ref(&event));
            }
            _ = refresh.tick() => {
                let engine = lock(&engine);
                if engine.clock_demand() != ClockDemand::Idle {
                    println!("{}", status_line(&engine));
                }
            }
        }
    }

    clock.abort();
    store.save_engine(&lock(&engine))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotan_core::Settings;

    #[test]
    fn parse_input_understands_shortcuts() {
        assert_eq!(parse_input("s"), Some(Input::Start));
        assert_eq!(parse_input("R"), Some(Input::ResetAll));
        assert_eq!(parse_input("r"), Some(Input::Reset));
        assert_eq!(parse_input("lb"), Some(Input::Session(SessionKind::LongBreak)));
        assert_eq!(parse_input("shortBreak"), Some(Input::Session(SessionKind::ShortBreak)));
        assert_eq!(parse_input("x"), None);
    }

    #[tokio::test]
    async fn refresh_does_not_fire_immediately() {
        let mut refresh = refresh_interval();
        let early = time::timeout(std::time::Duration::from_millis(200), refresh.tick()).await;
        assert!(early.is_err());
    }

    #[test]
    fn status_line_shows_clock_and_dots() {
        let engine = SessionEngine::new(Settings::default());
        let line = status_line(&engine);
        assert!(line.starts_with("25:00"));
        assert!(line.contains("○○○○"));
        assert!(line.contains("[Pomotan]"));
    }
}
