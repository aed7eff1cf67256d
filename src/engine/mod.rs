//! Countdown engine for the widget.
//!
//! This module contains the time-keeping core:
//! - `countdown`: countdown state, guarded transitions and formatting
//! - `ticker`: cancellable periodic tick handle

pub mod countdown;
pub mod ticker;

pub use countdown::{format_countdown, CountdownState, TickOutcome, TimeEngine};
pub use ticker::{TickSink, Ticker, TICK_PERIOD};
