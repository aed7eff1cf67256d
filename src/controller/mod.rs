//! Mode controller for the widget.
//!
//! This module owns which mode is active, the Pomodoro phase and round
//! counter, and the user-editable durations. It validates user commands and
//! forwards them to the [`TimeEngine`]:
//! - Mode switches with cross-mode reset semantics
//! - Pomodoro work/break transitions on explicit confirmation
//! - Duration edits and presets that resync an idle countdown
//! - Events for notifications and display

pub mod command;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::clock::ClockState;
use crate::engine::{format_countdown, CountdownState, TickOutcome, TickSink, TimeEngine};
use crate::types::{
    AppMode, CommandError, DurationError, DurationField, Durations, PomodoroPhase, Snapshot,
    ViewState, WidgetConfig,
};

pub use command::{Command, PresetChoice};

// ============================================================================
// ControllerEvent
// ============================================================================

/// Events emitted as the controller changes state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Countdown started
    Started {
        /// Seconds left
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Seconds left
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Seconds left
        remaining_seconds: u32,
    },
    /// Countdown reached zero
    Completed {
        /// Mode that completed
        mode: AppMode,
        /// Phase that completed, in Pomodoro mode
        phase: Option<PomodoroPhase>,
    },
    /// Countdown reloaded from a duration
    CountdownReset {
        /// Seconds loaded
        remaining_seconds: u32,
    },
    /// Pomodoro phase advanced
    PhaseChanged {
        /// New phase
        phase: PomodoroPhase,
        /// Current round
        round: u32,
    },
    /// Round counter back to 1
    RoundsReset,
    /// Another mode entered
    ModeSwitched {
        /// New mode
        mode: AppMode,
    },
    /// A duration value changed
    DurationUpdated {
        /// Edited field
        field: DurationField,
        /// New minutes
        minutes: u32,
        /// Whether the displayed countdown picked up the new value
        resynced: bool,
    },
    /// Work and break set together
    PresetApplied {
        /// Work minutes
        work: u32,
        /// Break minutes
        brk: u32,
    },
    /// Clock zone changed
    TimezoneChanged {
        /// New zone name
        timezone: String,
    },
    /// Menu, theme or clock face changed
    ViewChanged(ViewState),
}

// ============================================================================
// ModeController
// ============================================================================

/// Mediates between user commands and the countdown engine.
pub struct ModeController {
    mode: AppMode,
    phase: PomodoroPhase,
    round: u32,
    durations: Durations,
    engine: TimeEngine,
    clock: ClockState,
    view: ViewState,
    event_tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl ModeController {
    /// Creates a controller from a configuration.
    ///
    /// An invalid configuration falls back to the default durations.
    pub fn new(config: WidgetConfig, event_tx: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        let durations = match config.validate() {
            Ok(()) => config.durations,
            Err(e) => {
                tracing::warn!(error = %e, "invalid durations in config, using defaults");
                Durations::default()
            }
        };

        let initial_field = match config.mode {
            AppMode::Timer => DurationField::Timer,
            AppMode::Pomodoro | AppMode::Clock => DurationField::Work,
        };

        Self {
            mode: config.mode,
            phase: PomodoroPhase::Work,
            round: 1,
            durations,
            engine: TimeEngine::new(durations.seconds(initial_field)),
            clock: ClockState::new(config.timezone),
            view: ViewState {
                menu_open: false,
                theme: config.theme,
                show_clock: config.mode == AppMode::Clock,
            },
            event_tx,
        }
    }

    /// Attaches the sink that receives countdown ticks while running.
    pub fn with_tick_sink(mut self, sink: TickSink) -> Self {
        self.engine = self.engine.with_tick_sink(sink);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the active mode.
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Returns the Pomodoro phase.
    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    /// Returns the round counter.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Returns the current durations.
    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    /// Returns the countdown state.
    pub fn countdown(&self) -> CountdownState {
        self.engine.state()
    }

    /// Returns the clock state.
    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// Returns the view flags.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Returns true while a countdown tick handle is live.
    pub fn has_live_ticker(&self) -> bool {
        self.engine.has_live_ticker()
    }

    /// Returns the formatted time for the active mode.
    pub fn display(&self) -> String {
        match self.mode {
            AppMode::Clock => self.clock.display(),
            AppMode::Pomodoro | AppMode::Timer => format_countdown(self.engine.remaining_seconds()),
        }
    }

    /// Captures everything needed to draw the widget.
    pub fn snapshot(&self) -> Snapshot {
        let countdown = self.engine.state();
        Snapshot {
            mode: self.mode,
            phase: (self.mode == AppMode::Pomodoro).then_some(self.phase),
            round: self.round,
            remaining_seconds: countdown.remaining_seconds,
            is_running: countdown.is_running,
            is_completed: countdown.is_completed,
            display: self.display(),
            durations: self.durations,
            timezone: self.clock.timezone().to_string(),
            view: self.view,
        }
    }

    // ------------------------------------------------------------------------
    // Command dispatch
    // ------------------------------------------------------------------------

    /// Applies a command.
    ///
    /// Only invalid duration values produce an error, and they leave the
    /// state unchanged. Commands that do not apply in the current state are
    /// silently ignored.
    pub fn dispatch(&mut self, command: Command) -> Result<(), CommandError> {
        tracing::debug!(command = %command, "dispatching command");

        match command {
            Command::ToggleRunPause => self.toggle_run_pause(),
            Command::ResetCurrent => self.reset_current(),
            Command::ResetRounds => self.reset_rounds(),
            Command::SwitchMode(mode) => self.switch_mode(mode),
            Command::AdvanceRound => {
                self.advance_round();
            }
            Command::ToggleMenu => self.toggle_menu(),
            Command::CloseMenu => self.close_menu(),
            Command::ToggleTheme => self.toggle_theme(),
            Command::ToggleClockView => self.toggle_clock_view(),
            Command::EditDuration(field, raw) => self.edit_duration(field, &raw)?,
            Command::ApplyPreset(choice) => self.apply_preset(choice)?,
            Command::SetTimezone(timezone) => self.set_timezone(timezone),
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Countdown control
    // ------------------------------------------------------------------------

    /// Primary action: reloads a finished countdown, otherwise starts or
    /// pauses.
    ///
    /// A countdown counts as finished at zero, and also after completion
    /// when an idle duration edit has put a fresh value on display.
    pub fn toggle_run_pause(&mut self) {
        if !self.mode.has_countdown() {
            tracing::debug!("toggle ignored in clock mode");
            return;
        }

        if self.engine.remaining_seconds() == 0 || self.engine.is_completed() {
            self.reset_current();
        } else if self.engine.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Starts the countdown of the active mode.
    pub fn start(&mut self) {
        if !self.mode.has_countdown() {
            return;
        }
        if self.engine.start() {
            self.emit(ControllerEvent::Started {
                remaining_seconds: self.engine.remaining_seconds(),
            });
        }
    }

    /// Pauses the countdown.
    pub fn pause(&mut self) {
        if self.engine.pause() {
            self.emit(ControllerEvent::Paused {
                remaining_seconds: self.engine.remaining_seconds(),
            });
        }
    }

    /// Stops, clears completion and reloads the active phase's duration.
    ///
    /// The round counter is untouched. Does nothing in clock mode.
    pub fn reset_current(&mut self) {
        let Some(seconds) = self.active_duration_seconds() else {
            tracing::debug!("reset ignored in clock mode");
            return;
        };
        self.engine.reset(seconds);
        self.emit(ControllerEvent::CountdownReset {
            remaining_seconds: seconds,
        });
    }

    /// Returns to round 1 in the Work phase.
    ///
    /// In every mode the countdown is stopped, completion is cleared and the
    /// work duration is reloaded.
    pub fn reset_rounds(&mut self) {
        self.round = 1;
        self.phase = PomodoroPhase::Work;
        let seconds = self.durations.seconds(DurationField::Work);
        self.engine.reset(seconds);

        self.emit(ControllerEvent::RoundsReset);
        self.emit(ControllerEvent::CountdownReset {
            remaining_seconds: seconds,
        });
    }

    /// Enters `target`, stopping any countdown and clearing completion.
    ///
    /// The round counter is never reset here.
    pub fn switch_mode(&mut self, target: AppMode) {
        self.engine.halt();
        self.mode = target;

        match target {
            AppMode::Pomodoro => {
                self.phase = PomodoroPhase::Work;
                self.engine.reset(self.durations.seconds(DurationField::Work));
                self.view.show_clock = false;
            }
            AppMode::Timer => {
                self.engine.reset(self.durations.seconds(DurationField::Timer));
                self.view.show_clock = false;
            }
            AppMode::Clock => {
                // Countdown stays frozen where it was.
                self.view.show_clock = true;
            }
        }

        tracing::info!(mode = target.as_str(), "mode switched");
        self.emit(ControllerEvent::ModeSwitched { mode: target });
    }

    /// Moves a completed Pomodoro phase on to the next one.
    ///
    /// Work goes to Break; Break goes to Work and increments the round.
    /// Returns false (and does nothing) outside Pomodoro mode or before the
    /// countdown has completed.
    pub fn advance_round(&mut self) -> bool {
        if self.mode != AppMode::Pomodoro || !self.engine.is_completed() {
            tracing::debug!("advance_round ignored: no completed pomodoro phase");
            return false;
        }

        match self.phase {
            PomodoroPhase::Work => {
                self.phase = PomodoroPhase::Break;
            }
            PomodoroPhase::Break => {
                self.phase = PomodoroPhase::Work;
                self.round += 1;
            }
        }
        self.engine.reset(self.durations.seconds(self.phase.duration_field()));

        tracing::info!(phase = self.phase.as_str(), round = self.round, "phase advanced");
        self.emit(ControllerEvent::PhaseChanged {
            phase: self.phase,
            round: self.round,
        });
        true
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Applies a tick delivered by the countdown's periodic handle.
    pub fn on_countdown_tick(&mut self, generation: u64) -> TickOutcome {
        let outcome = self.engine.on_scheduled_tick(generation);
        self.observe_tick(outcome);
        outcome
    }

    /// Advances the countdown by one second directly.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();
        self.observe_tick(outcome);
        outcome
    }

    /// Stores a new wall-clock reading for the clock.
    pub fn on_clock_tick(&mut self, now: DateTime<Utc>) {
        self.clock.refresh(now);
    }

    fn observe_tick(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Counted { remaining_seconds } => {
                tracing::trace!(remaining_seconds, "tick");
                self.emit(ControllerEvent::Tick { remaining_seconds });
            }
            TickOutcome::Completed => self.on_countdown_completed(),
        }
    }

    /// Reports completion. The phase is not changed; that waits for
    /// [`ModeController::advance_round`].
    fn on_countdown_completed(&mut self) {
        let phase = (self.mode == AppMode::Pomodoro).then_some(self.phase);
        tracing::info!(mode = self.mode.as_str(), ?phase, "countdown completed");
        self.emit(ControllerEvent::Completed {
            mode: self.mode,
            phase,
        });
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Parses and stores a duration.
    ///
    /// `raw` must be a base-10 integer once trimmed. Text such as `25abc` or
    /// `1.5` is rejected outright, never truncated to its leading digits.
    ///
    /// When the field feeds the countdown currently displayed and that
    /// countdown is idle, the countdown picks up the new value at once. A
    /// running countdown keeps going and the value applies on the next
    /// reset or phase change.
    pub fn edit_duration(&mut self, field: DurationField, raw: &str) -> Result<(), DurationError> {
        let minutes = match self.durations.set_raw(field, raw) {
            Ok(minutes) => minutes,
            Err(e) => {
                tracing::debug!(field = field.as_str(), raw, error = %e, "duration edit rejected");
                return Err(e);
            }
        };

        let resynced = self.displays(field) && self.engine.set_duration_if_idle(minutes * 60);

        self.emit(ControllerEvent::DurationUpdated {
            field,
            minutes,
            resynced,
        });
        Ok(())
    }

    /// Sets work and break together.
    ///
    /// An idle Pomodoro countdown is resynced to the active phase.
    pub fn apply_preset(&mut self, choice: PresetChoice) -> Result<(), DurationError> {
        let (work, brk) = choice.minutes();
        if let Err(e) = self.durations.set_work_and_break(work, brk) {
            tracing::debug!(work, brk, error = %e, "preset rejected");
            return Err(e);
        }

        if self.mode == AppMode::Pomodoro {
            let seconds = self.durations.seconds(self.phase.duration_field());
            self.engine.set_duration_if_idle(seconds);
        }

        self.emit(ControllerEvent::PresetApplied { work, brk });
        Ok(())
    }

    /// Selects the clock's zone. Unknown zones render as local time.
    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        let timezone = timezone.into();
        if !crate::clock::is_listed(&timezone) {
            tracing::debug!(timezone = %timezone, "timezone is not in the picker list");
        }
        self.clock.set_timezone(timezone.clone());
        self.emit(ControllerEvent::TimezoneChanged { timezone });
    }

    // ------------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------------

    /// Opens or closes the settings menu.
    pub fn toggle_menu(&mut self) {
        self.view.menu_open = !self.view.menu_open;
        self.emit(ControllerEvent::ViewChanged(self.view));
    }

    /// Closes the settings menu if it is open.
    pub fn close_menu(&mut self) {
        if self.view.menu_open {
            self.view.menu_open = false;
            self.emit(ControllerEvent::ViewChanged(self.view));
        }
    }

    /// Switches between light and dark.
    pub fn toggle_theme(&mut self) {
        self.view.theme = self.view.theme.toggled();
        self.emit(ControllerEvent::ViewChanged(self.view));
    }

    /// Shows or hides the clock face.
    pub fn toggle_clock_view(&mut self) {
        self.view.show_clock = !self.view.show_clock;
        self.emit(ControllerEvent::ViewChanged(self.view));
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Duration feeding the displayed countdown, if any.
    fn active_duration_seconds(&self) -> Option<u32> {
        match self.mode {
            AppMode::Pomodoro => Some(self.durations.seconds(self.phase.duration_field())),
            AppMode::Timer => Some(self.durations.seconds(DurationField::Timer)),
            AppMode::Clock => None,
        }
    }

    /// Returns true if `field` feeds the countdown currently displayed.
    fn displays(&self, field: DurationField) -> bool {
        match (self.mode, field) {
            (AppMode::Pomodoro, DurationField::Work) => self.phase == PomodoroPhase::Work,
            (AppMode::Pomodoro, DurationField::Break) => self.phase == PomodoroPhase::Break,
            (AppMode::Timer, DurationField::Timer) => true,
            _ => false,
        }
    }

    fn emit(&self, event: ControllerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
