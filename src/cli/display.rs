//! Display utilities for the pomoclock CLI.
//!
//! This module provides formatted output for:
//! - The full widget frame (mode bar, time, phase line, settings menu)
//! - The one-line live refresh
//! - Event notices, help text and the timezone list
//! - Error messages

use std::io::{self, Write};

use crate::clock::TIMEZONES;
use crate::controller::ControllerEvent;
use crate::session::{Renderer, ShowRequest};
use crate::types::{AppMode, PomodoroPhase, Preset, Snapshot, Theme};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the whole widget.
    pub fn render_frame(snapshot: &Snapshot) -> String {
        let mut lines = vec![
            Self::mode_bar(snapshot.mode),
            format!("  {}", snapshot.display),
            Self::detail_line(snapshot),
            format!("  {}", Self::status_word(snapshot)),
        ];

        if snapshot.view.menu_open {
            lines.extend(Self::menu_lines(snapshot));
        }

        lines.join("\n")
    }

    /// Renders the compact line used for per-second refreshes.
    pub fn render_line(snapshot: &Snapshot) -> String {
        match (snapshot.mode, snapshot.phase) {
            (AppMode::Pomodoro, Some(phase)) => format!(
                "{} {} {}  ROUND {}  {}",
                snapshot.mode.label(),
                phase.label(),
                snapshot.display,
                snapshot.round,
                Self::status_word(snapshot)
            ),
            (AppMode::Clock, _) => format!("CLOCK {}  {}", snapshot.display, snapshot.timezone),
            _ => format!(
                "{} {}  {}",
                snapshot.mode.label(),
                snapshot.display,
                Self::status_word(snapshot)
            ),
        }
    }

    /// Returns a notice for events worth telling the user about.
    pub fn describe_event(event: &ControllerEvent) -> Option<String> {
        match event {
            ControllerEvent::Completed {
                phase: Some(phase), ..
            } => Some(format!(
                "{} COMPLETE - press enter for the next round",
                phase.label()
            )),
            ControllerEvent::Completed { .. } => Some("TIME'S UP".to_string()),
            ControllerEvent::PhaseChanged { phase, round } => {
                Some(format!("{} - round {}", phase.label(), round))
            }
            ControllerEvent::RoundsReset => Some("Rounds reset".to_string()),
            ControllerEvent::DurationUpdated { field, minutes, .. } => {
                Some(format!("{} set to {} min", field.as_str(), minutes))
            }
            ControllerEvent::PresetApplied { work, brk } => {
                Some(format!("Preset applied: {} / {} min", work, brk))
            }
            ControllerEvent::TimezoneChanged { timezone } => {
                if crate::clock::resolve_timezone(timezone).is_some() {
                    Some(format!("Timezone: {}", timezone))
                } else {
                    Some(format!("Timezone: {} (unknown, showing local time)", timezone))
                }
            }
            _ => None,
        }
    }

    /// Returns the key binding reference.
    pub fn help_text() -> String {
        [
            "Commands (one per line):",
            "  <enter> / space   start or pause",
            "  r                 reset the current countdown",
            "  rounds            back to round 1",
            "  n / next          next round after a completed phase",
            "  1 / 2 / 3         pomodoro / timer / clock",
            "  m / esc           open / close the settings menu",
            "  d                 toggle theme",
            "  c                 toggle the clock face",
            "  work N            work minutes (1-1440)",
            "  break N           break minutes (1-1440)",
            "  timer N           timer minutes (1-1440)",
            "  preset NAME|W B   classic, long, short, deep work, or two numbers",
            "  tz ZONE           clock timezone, e.g. Asia/Tokyo",
            "  status / json     print the current state",
            "  zones             list timezones",
            "  q                 quit",
        ]
        .join("\n")
    }

    /// Prints the timezone list.
    pub fn show_timezones() {
        println!("Timezones:");
        for zone in TIMEZONES {
            println!("  {}", zone);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows the closing line of a session.
    pub fn show_goodbye(snapshot: &Snapshot) {
        println!("Bye. Finished on round {}.", snapshot.round);
    }

    fn mode_bar(active: AppMode) -> String {
        [AppMode::Pomodoro, AppMode::Timer, AppMode::Clock]
            .iter()
            .map(|mode| {
                if *mode == active {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn detail_line(snapshot: &Snapshot) -> String {
        match snapshot.mode {
            AppMode::Pomodoro => {
                let phase = snapshot.phase.unwrap_or_default();
                let mark = |p: PomodoroPhase| if p == phase { "[x]" } else { "[ ]" };
                format!(
                    "  WORK {}  BREAK {}  ROUND {}",
                    mark(PomodoroPhase::Work),
                    mark(PomodoroPhase::Break),
                    snapshot.round
                )
            }
            AppMode::Timer => format!("  TIMER {} MIN", snapshot.durations.timer_minutes()),
            AppMode::Clock => format!("  {}", snapshot.timezone),
        }
    }

    fn status_word(snapshot: &Snapshot) -> &'static str {
        if snapshot.mode == AppMode::Clock {
            "live"
        } else if snapshot.is_completed {
            "done"
        } else if snapshot.is_running {
            "running"
        } else {
            "paused"
        }
    }

    fn menu_lines(snapshot: &Snapshot) -> Vec<String> {
        let presets = Preset::ALL
            .iter()
            .map(|p| {
                let (work, brk) = p.minutes();
                format!("{} {}/{}", p.name(), work, brk)
            })
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            "  -- SETTINGS --".to_string(),
            format!(
                "  work {}  break {}  timer {}",
                snapshot.durations.work_minutes(),
                snapshot.durations.break_minutes(),
                snapshot.durations.timer_minutes()
            ),
            format!("  presets: {}", presets),
            format!("  timezone: {}", snapshot.timezone),
            format!(
                "  theme: {}  clock face: {}",
                snapshot.view.theme.as_str(),
                if snapshot.view.show_clock { "on" } else { "off" }
            ),
        ]
    }
}

// ============================================================================
// TerminalRenderer
// ============================================================================

/// Renderer that writes the widget as plain text.
///
/// Frames are printed in full; refreshes overwrite the current line.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    line_open: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Creates a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_open: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn close_line(&mut self) -> io::Result<()> {
        if self.line_open {
            self.line_open = false;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_block(&mut self, text: &str) {
        let result = self
            .close_line()
            .and_then(|()| writeln!(self.out, "{}", text))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "failed to write output");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn frame(&mut self, snapshot: &Snapshot) {
        let mut text = Display::render_frame(snapshot);
        if snapshot.view.theme == Theme::Dark {
            // Inverse video.
            text = format!("\x1b[7m{}\x1b[0m", text);
        }
        self.write_block(&text);
    }

    fn refresh(&mut self, snapshot: &Snapshot) {
        let line = Display::render_line(snapshot);
        // Trailing spaces clear leftovers from a longer previous line.
        let result = write!(self.out, "\r{:<60}", line).and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.line_open = true,
            Err(e) => tracing::debug!(error = %e, "failed to write output"),
        }
    }

    fn event(&mut self, event: &ControllerEvent) {
        if let Some(notice) = Display::describe_event(event) {
            self.write_block(&format!("* {}", notice));
        }
    }

    fn show(&mut self, request: ShowRequest, snapshot: &Snapshot) {
        let text = match request {
            ShowRequest::Status => Display::render_frame(snapshot),
            ShowRequest::Json => match serde_json::to_string_pretty(snapshot) {
                Ok(json) => json,
                Err(e) => {
                    Display::show_error(&format!("Failed to serialize status: {}", e));
                    return;
                }
            },
            ShowRequest::Help => Display::help_text(),
            ShowRequest::Timezones => {
                let mut text = String::from("Timezones:");
                for zone in TIMEZONES {
                    text.push_str("\n  ");
                    text.push_str(zone);
                }
                text
            }
        };
        self.write_block(&text);
    }
}

// ============================================================================
// Tests
// ============================================================================
