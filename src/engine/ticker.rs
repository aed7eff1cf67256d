//! Cancellable one-second tick source.
//!
//! A [`Ticker`] is a spawned tokio task that calls its sink once per period.
//! The task lives exactly as long as the handle: dropping the handle aborts
//! the task, so a released ticker can never deliver another callback.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Length of one logical tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Callback invoked on every tick with the ticker's generation.
///
/// Returning `false` means the receiving side is gone and the ticker stops.
pub type TickSink = Arc<dyn Fn(u64) -> bool + Send + Sync>;

/// Handle to a running periodic task.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawns a ticker on the current tokio runtime.
    ///
    /// The first tick fires one `period` after the call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(period: Duration, generation: u64, sink: TickSink) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !sink(generation) {
                    tracing::debug!(generation, "tick receiver closed, stopping ticker");
                    break;
                }
            }
        });

        Self { generation, handle }
    }

    /// Returns the generation this ticker was spawned with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================
