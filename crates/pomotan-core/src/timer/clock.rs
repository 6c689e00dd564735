//! Host-side clock for driving a [`SessionEngine`].
//!
//! The engine never owns a timer. Hosts subscribe a one-second clock while
//! [`SessionEngine::clock_demand`] reports something other than
//! [`ClockDemand::Idle`] and drop it otherwise. [`ClockDriver`] is that
//! contract for a tokio host with the engine behind a mutex.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::SessionEngine;
use crate::events::Event;

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Which one-second clock the engine currently needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockDemand {
    /// Nothing to drive; the host should not schedule pulses.
    Idle,
    /// The session timer is running.
    Tick,
    /// The auto-start countdown is running.
    Countdown,
}

/// Engine shared between the clock task and command handlers.
/// All mutation goes through the one mutex.
pub type SharedEngine = Arc<Mutex<SessionEngine>>;

pub fn shared(engine: SessionEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Lock the engine, recovering the guard if a previous holder panicked.
/// Every engine transition leaves the state consistent, so a poisoned lock
/// still holds a usable engine.
pub fn lock(engine: &SharedEngine) -> MutexGuard<'_, SessionEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pulses a shared engine once per second while it has clock demand and
/// forwards the produced events to a channel.
pub struct ClockDriver {
    engine: SharedEngine,
    events: mpsc::UnboundedSender<Event>,
    wake: Arc<Notify>,
    period: Duration,
}

impl ClockDriver {
    pub fn new(engine: SharedEngine, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            engine,
            events,
            wake: Arc::new(Notify::new()),
            period: CLOCK_PERIOD,
        }
    }

    /// Handle the host uses to wake a parked driver after a command that may
    /// have created clock demand (start, settings change, ...).
    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    /// Run until the event receiver is dropped.
    pub async fn run(self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let demand = lock(&self.engine).clock_demand();
            if demand == ClockDemand::Idle {
                debug!("clock parked");
                tokio::select! {
                    _ = self.wake.notified() => {}
                    _ = self.events.closed() => {
                        debug!("event receiver dropped, stopping clock");
                        return;
                    }
                }
                interval.reset();
                continue;
            }

            interval.tick().await;
            let events = lock(&self.engine).on_clock();
            trace!(?demand, produced = events.len(), "clock pulse");
            for event in events {
                if self.events.send(event).is_err() {
                    debug!("event receiver dropped, stopping clock");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{SessionKind, Settings};

    fn quick_settings(auto_start: bool) -> Settings {
        Settings {
            focus_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            sessions_before_long_break: 2,
            auto_start,
            sound_enabled: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn driver_runs_session_to_completion() {
        let engine = shared(SessionEngine::new(quick_settings(false)));
        lock(&engine).start();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = ClockDriver::new(Arc::clone(&engine), tx);
        let task = tokio::spawn(driver.run());

        let started = Instant::now();
        loop {
            let event = rx.recv().await.expect("driver alive");
            if matches!(event, Event::SessionCompleted { .. }) {
                break;
            }
        }
        assert_eq!(started.elapsed(), Duration::from_secs(60));

        {
            let engine = lock(&engine);
            assert_eq!(engine.current_session(), SessionKind::ShortBreak);
            assert!(!engine.is_running());
        }
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn driver_carries_autostart_countdown() {
        let engine = shared(SessionEngine::new(quick_settings(true)));
        lock(&engine).start();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(ClockDriver::new(Arc::clone(&engine), tx).run());

        loop {
            let event = rx.recv().await.expect("driver alive");
            if let Event::AutoStartCommitted { session, .. } = event {
                assert_eq!(session, SessionKind::ShortBreak);
                break;
            }
        }
        assert!(lock(&engine).is_running());
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn parked_driver_stops_when_receiver_dropped() {
        let engine = shared(SessionEngine::new(quick_settings(false)));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(ClockDriver::new(engine, tx).run());

        time::sleep(Duration::from_secs(5)).await;
        assert!(!task.is_finished());
        drop(rx);
        time::timeout(Duration::from_secs(1), task)
            .await
            .expect("driver exits without a wake")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn parked_driver_wakes_on_notify() {
        let engine = shared(SessionEngine::new(quick_settings(false)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = ClockDriver::new(Arc::clone(&engine), tx);
        let wake = driver.waker();
        let task = tokio::spawn(driver.run());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(lock(&engine).time_left_secs(), 60);

        lock(&engine).start();
        wake.notify_one();
        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(lock(&engine).time_left_secs(), 50);
        assert!(rx.try_recv().is_err());
        task.abort();
    }
}
