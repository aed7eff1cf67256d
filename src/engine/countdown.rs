//! Countdown engine.
//!
//! This module provides the authoritative countdown value:
//! - Guarded transitions (start, pause, tick, reset, idle resync)
//! - Atomic completion when the countdown reaches zero
//! - Ownership of the periodic tick handle while running
//!
//! Every operation is a no-op when called in a state where it does not
//! apply. Nothing here returns an error.

use serde::{Deserialize, Serialize};

use super::ticker::{TickSink, Ticker, TICK_PERIOD};

// ============================================================================
// CountdownState
// ============================================================================

/// Countdown value and flags.
///
/// `is_running` and `is_completed` are never both true, and a countdown at
/// zero is never running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownState {
    /// Seconds left
    pub remaining_seconds: u32,
    /// Counting down
    pub is_running: bool,
    /// Reached zero by counting down
    pub is_completed: bool,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or a stale tick from a released handle
    Ignored,
    /// One second elapsed
    Counted {
        /// Seconds left after the tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero on this tick
    Completed,
}

// ============================================================================
// TimeEngine
// ============================================================================

/// Owns the countdown and the tick source that drives it.
pub struct TimeEngine {
    state: CountdownState,
    tick_sink: Option<TickSink>,
    ticker: Option<Ticker>,
    generation: u64,
}

impl TimeEngine {
    /// Creates an idle engine holding `duration_seconds`.
    ///
    /// Without a tick sink the engine never spawns a timer; ticks must be
    /// delivered through [`TimeEngine::tick`].
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            state: CountdownState {
                remaining_seconds: duration_seconds,
                is_running: false,
                is_completed: false,
            },
            tick_sink: None,
            ticker: None,
            generation: 0,
        }
    }

    /// Attaches the sink that receives periodic ticks while running.
    ///
    /// Ticks arrive at the sink tagged with a generation that must be passed
    /// back to [`TimeEngine::on_scheduled_tick`].
    pub fn with_tick_sink(mut self, sink: TickSink) -> Self {
        self.tick_sink = Some(sink);
        self.sync_ticker();
        self
    }

    /// Returns the current countdown state.
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Returns the seconds left.
    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    /// Returns true while counting down.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Returns true after reaching zero by counting down.
    pub fn is_completed(&self) -> bool {
        self.state.is_completed
    }

    /// Returns true while a periodic tick handle is held.
    pub fn has_live_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Starts counting down.
    ///
    /// Does nothing at zero, after completion, or when already running.
    /// Returns true if the engine transitioned to running.
    pub fn start(&mut self) -> bool {
        if self.state.is_running || self.state.is_completed || self.state.remaining_seconds == 0 {
            return false;
        }
        self.state.is_running = true;
        self.sync_ticker();
        true
    }

    /// Stops counting down. Returns true if the engine was running.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running {
            return false;
        }
        self.state.is_running = false;
        self.sync_ticker();
        true
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero stops the countdown and marks it completed in the same
    /// step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running || self.state.remaining_seconds == 0 {
            return TickOutcome::Ignored;
        }

        self.state.remaining_seconds -= 1;

        if self.state.remaining_seconds == 0 {
            self.state.is_running = false;
            self.state.is_completed = true;
            self.sync_ticker();
            return TickOutcome::Completed;
        }

        TickOutcome::Counted {
            remaining_seconds: self.state.remaining_seconds,
        }
    }

    /// Applies a tick delivered by the periodic handle.
    ///
    /// Ticks from a handle that has since been released are ignored.
    pub fn on_scheduled_tick(&mut self, generation: u64) -> TickOutcome {
        match &self.ticker {
            Some(ticker) if ticker.generation() == generation => self.tick(),
            _ => {
                tracing::trace!(generation, "ignoring stale tick");
                TickOutcome::Ignored
            }
        }
    }

    /// Loads a fresh duration and clears both flags.
    ///
    /// A zero duration is ignored.
    pub fn reset(&mut self, duration_seconds: u32) {
        if duration_seconds == 0 {
            tracing::debug!("ignoring reset to a zero duration");
            return;
        }
        self.state = CountdownState {
            remaining_seconds: duration_seconds,
            is_running: false,
            is_completed: false,
        };
        self.sync_ticker();
    }

    /// Overwrites the remaining time unless the countdown is running.
    ///
    /// Returns true if the value was applied.
    pub fn set_duration_if_idle(&mut self, duration_seconds: u32) -> bool {
        if self.state.is_running {
            return false;
        }
        self.state.remaining_seconds = duration_seconds;
        true
    }

    /// Stops counting down and clears completion, keeping the remaining time.
    pub fn halt(&mut self) {
        self.state.is_running = false;
        self.state.is_completed = false;
        self.sync_ticker();
    }

    /// Keeps the tick handle live exactly while running.
    fn sync_ticker(&mut self) {
        match (self.state.is_running, self.ticker.is_some()) {
            (true, false) => {
                if let Some(sink) = &self.tick_sink {
                    self.generation += 1;
                    self.ticker = Some(Ticker::spawn(TICK_PERIOD, self.generation, sink.clone()));
                    tracing::trace!(generation = self.generation, "countdown ticker acquired");
                }
            }
            (false, true) => {
                self.ticker = None;
                tracing::trace!(generation = self.generation, "countdown ticker released");
            }
            _ => {}
        }
    }
}

/// Formats seconds as `MM:SS`.
///
/// Both fields are zero-padded to two digits; the minutes field grows past
/// two digits for long durations (`1440:00`).
pub fn format_countdown(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// Tests
// ============================================================================
