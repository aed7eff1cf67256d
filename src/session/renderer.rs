//! Output seam for the session loop.
//!
//! The session never prints. It hands snapshots and events to a
//! [`Renderer`], so terminal output, tests and any other front end plug in
//! the same way.

use std::sync::{Arc, Mutex, PoisonError};

use crate::controller::ControllerEvent;
use crate::types::Snapshot;

/// Things a user can ask to see without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowRequest {
    /// Human-readable status
    Status,
    /// Status as JSON
    Json,
    /// Key bindings
    Help,
    /// Timezone list
    Timezones,
}

/// Receives everything the session wants displayed.
pub trait Renderer: Send {
    /// Draws the whole widget after a command.
    fn frame(&mut self, snapshot: &Snapshot);

    /// Redraws the time after a tick.
    fn refresh(&mut self, snapshot: &Snapshot);

    /// Reports a controller event.
    fn event(&mut self, event: &ControllerEvent);

    /// Answers a show request.
    fn show(&mut self, request: ShowRequest, snapshot: &Snapshot);
}

#[derive(Debug, Default)]
struct Recorded {
    frames: Vec<Snapshot>,
    refreshes: Vec<Snapshot>,
    events: Vec<ControllerEvent>,
    shown: Vec<ShowRequest>,
}

/// Renderer that keeps everything it receives, for tests.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Recorded) -> T) -> T {
        let mut recorded = self.recorded.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut recorded)
    }

    #[must_use]
    pub fn frames(&self) -> Vec<Snapshot> {
        self.with(|r| r.frames.clone())
    }

    #[must_use]
    pub fn refreshes(&self) -> Vec<Snapshot> {
        self.with(|r| r.refreshes.clone())
    }

    #[must_use]
    pub fn events(&self) -> Vec<ControllerEvent> {
        self.with(|r| r.events.clone())
    }

    #[must_use]
    pub fn shown(&self) -> Vec<ShowRequest> {
        self.with(|r| r.shown.clone())
    }

    /// Returns the most recent frame or refresh.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.with(|r| {
            r.refreshes
                .last()
                .or_else(|| r.frames.last())
                .cloned()
        })
    }

    pub fn clear(&self) {
        self.with(|r| *r = Recorded::default());
    }
}

impl Renderer for RecordingRenderer {
    fn frame(&mut self, snapshot: &Snapshot) {
        self.with(|r| r.frames.push(snapshot.clone()));
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        self.with(|r| r.refreshes.push(snapshot.clone()));
    }

    fn event(&mut self, event: &ControllerEvent) {
        self.with(|r| r.events.push(event.clone()));
    }

    fn show(&mut self, request: ShowRequest, _snapshot: &Snapshot) {
        self.with(|r| r.shown.push(request));
    }
}
