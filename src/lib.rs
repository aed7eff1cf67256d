//! Pomoclock library
//!
//! This library provides the core of a small productivity widget with three
//! modes: Pomodoro work/break intervals, a freeform countdown timer and a
//! live timezone clock. It includes:
//! - Type definitions for modes, durations, configuration and snapshots
//! - The countdown engine and its cancellable one-second ticker
//! - The timezone clock
//! - The mode controller and its command surface
//! - The session loop that serializes commands and ticks
//! - CLI command parsing, text bindings and terminal display

pub mod cli;
pub mod clock;
pub mod controller;
pub mod engine;
pub mod session;
pub mod types;

// Re-export commonly used types for convenience
pub use controller::{Command, ControllerEvent, ModeController, PresetChoice};
pub use engine::{format_countdown, CountdownState, TickOutcome, TimeEngine};
pub use session::{RecordingRenderer, Renderer, Session, SessionMessage, ShowRequest};
pub use types::{
    AppMode, CommandError, DurationError, DurationField, Durations, PomodoroPhase, Preset,
    Snapshot, Theme, ViewState, WidgetConfig,
};
