//! Session event loop.
//!
//! All state changes happen on one task that drains one queue. User
//! commands, countdown ticks and clock refreshes arrive as
//! [`SessionMessage`]s and are applied strictly one after another.
//!
//! The session acquires two tick sources: the countdown ticker, held by the
//! engine only while the countdown runs, and the clock refresher, held for
//! the whole session. Both are released when [`Session::run`] returns.

pub mod renderer;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::controller::{Command, ControllerEvent, ModeController};
use crate::engine::{TickOutcome, TickSink, Ticker, TICK_PERIOD};
use crate::types::{AppMode, Snapshot, WidgetConfig};

pub use renderer::{RecordingRenderer, Renderer, ShowRequest};

/// Generation used by the clock refresher.
const CLOCK_TICKER_GENERATION: u64 = 0;

// ============================================================================
// SessionMessage
// ============================================================================

/// Everything the session loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMessage {
    /// A user command
    Command(Command),
    /// A request to print something
    Show(ShowRequest),
    /// Countdown tick from the ticker with this generation
    CountdownTick(u64),
    /// Clock refresh
    ClockTick,
    /// Stop the loop and release all timers
    Shutdown,
}

// ============================================================================
// Session
// ============================================================================

/// A running widget: controller, queue and renderer.
pub struct Session {
    controller: ModeController,
    tx: mpsc::UnboundedSender<SessionMessage>,
    rx: mpsc::UnboundedReceiver<SessionMessage>,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    renderer: Box<dyn Renderer>,
}

impl Session {
    /// Creates a session. Nothing ticks until [`Session::run`] is awaited.
    pub fn new(config: WidgetConfig, renderer: Box<dyn Renderer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let tick_tx = tx.clone();
        let sink: TickSink =
            Arc::new(move |generation| tick_tx.send(SessionMessage::CountdownTick(generation)).is_ok());

        let controller = ModeController::new(config, event_tx).with_tick_sink(sink);

        Self {
            controller,
            tx,
            rx,
            events,
            renderer,
        }
    }

    /// Returns a handle for feeding messages into the session.
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionMessage> {
        self.tx.clone()
    }

    /// Runs until a [`SessionMessage::Shutdown`] arrives.
    ///
    /// Returns the final state. Every timer the session acquired has been
    /// released by the time this returns.
    pub async fn run(mut self) -> Snapshot {
        let clock_tx = self.tx.clone();
        let clock_sink: TickSink =
            Arc::new(move |_| clock_tx.send(SessionMessage::ClockTick).is_ok());
        let clock_ticker = Ticker::spawn(TICK_PERIOD, CLOCK_TICKER_GENERATION, clock_sink);

        tracing::info!(mode = self.controller.mode().as_str(), "session started");
        self.renderer.frame(&self.controller.snapshot());

        while let Some(message) = self.rx.recv().await {
            if !self.handle(message) {
                break;
            }
            self.flush_events();
        }

        // The countdown ticker is released when `self` drops below.
        drop(clock_ticker);
        let snapshot = self.controller.snapshot();
        tracing::info!(round = snapshot.round, "session stopped");
        snapshot
    }

    /// Applies one message. Returns false when the loop should stop.
    fn handle(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::Command(command) => {
                self.apply(command);
                self.renderer.frame(&self.controller.snapshot());
            }
            SessionMessage::Show(request) => {
                self.renderer.show(request, &self.controller.snapshot());
            }
            SessionMessage::CountdownTick(generation) => {
                if self.controller.on_countdown_tick(generation) != TickOutcome::Ignored {
                    self.renderer.refresh(&self.controller.snapshot());
                }
            }
            SessionMessage::ClockTick => {
                self.controller.on_clock_tick(Utc::now());
                if self.controller.mode() == AppMode::Clock {
                    self.renderer.refresh(&self.controller.snapshot());
                }
            }
            SessionMessage::Shutdown => return false,
        }
        true
    }

    fn apply(&mut self, command: Command) {
        if self.controller.view().menu_open && command.is_blocked_by_menu() {
            tracing::debug!(command = %command, "ignored while the menu is open");
            return;
        }
        if let Err(e) = self.controller.dispatch(command) {
            tracing::debug!(error = %e, "command rejected");
        }
    }

    fn flush_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.renderer.event(&event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
