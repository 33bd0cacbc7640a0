//! Elapsed-time counter for an active recording
//!
//! Ticks once per second on a spawned task with no upper bound. Freezing
//! stops the ticker and keeps the value for display.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct ElapsedCounter {
    secs: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl ElapsedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from zero. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.freeze();
        self.secs.store(0, Ordering::Relaxed);

        let secs = self.secs.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                secs.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    /// Stop ticking, keeping the current value
    pub fn freeze(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Stop ticking and zero the value
    pub fn reset(&mut self) {
        self.freeze();
        self.secs.store(0, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.secs.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for ElapsedCounter {
    fn drop(&mut self) {
        self.freeze();
    }
}
