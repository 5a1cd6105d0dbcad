//! Elapsed-time counter and the background task that ticks it.
//!
//! The counter is shared with the ticker task through atomics; freezing it makes
//! every later tick a no-op, so a tick that races with completion can never move
//! the recorded value.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Monotonic tick counter that stops counting once frozen.
#[derive(Debug, Default)]
pub struct ElapsedClock {
    ticks: AtomicU64,
    frozen: AtomicBool,
}

impl ElapsedClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            frozen: AtomicBool::new(false),
        }
    }

    /// Advance by one tick. Returns `false` if the clock is frozen.
    pub fn tick(&self) -> bool {
        if self.frozen.load(Ordering::SeqCst) {
            return false;
        }
        self.ticks.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Stop counting and return the final value.
    pub fn freeze(&self) -> u64 {
        self.frozen.store(true, Ordering::SeqCst);
        self.ticks.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn elapsed(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }
}

/// Background task ticking an [`ElapsedClock`] once per interval.
///
/// [`Ticker::stop`] aborts the task synchronously; dropping the ticker does the same.
#[derive(Debug)]
pub struct Ticker {
    clock: Arc<ElapsedClock>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// The ticker is not started. Call [`Ticker::start`] from inside a tokio runtime.
    #[must_use]
    pub const fn new(clock: Arc<ElapsedClock>, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            handle: None,
        }
    }

    /// Spawn the ticking task. No-op if already running or the clock is frozen.
    pub fn start(&mut self) {
        if self.is_running() || self.clock.is_frozen() {
            return;
        }

        let clock = Arc::clone(&self.clock);
        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !clock.tick() {
                    break;
                }
            }
        }));
        tracing::debug!(interval_ms = period.as_millis(), "ticker: started");
    }

    /// Abort the ticking task. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(elapsed = self.clock.elapsed(), "ticker: stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<ElapsedClock> {
        &self.clock
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
