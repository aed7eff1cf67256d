//! Text input bindings.
//!
//! Each line typed into a running session maps to exactly one
//! [`InputAction`]. Single keys mirror the widget's keyboard shortcuts; longer
//! words carry values such as durations, presets and timezones.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::controller::{Command, PresetChoice};
use crate::session::{SessionMessage, ShowRequest};
use crate::types::{AppMode, CommandError, DurationField, Durations, Preset};

use super::display::Display;

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Apply a command
    Command(Command),
    /// Print something
    Show(ShowRequest),
    /// End the session
    Quit,
}

impl From<Command> for InputAction {
    fn from(command: Command) -> Self {
        InputAction::Command(command)
    }
}

/// Parses one input line.
///
/// Keywords are case-insensitive; timezone names keep their case.
pub fn parse_line(line: &str) -> Result<InputAction, CommandError> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let keyword = head.to_ascii_lowercase();

    let action = match (keyword.as_str(), rest.is_empty()) {
        ("" | "space" | "p", true) => Command::ToggleRunPause.into(),
        ("r" | "reset", true) => Command::ResetCurrent.into(),
        ("rounds", true) => Command::ResetRounds.into(),
        ("m" | "menu", true) => Command::ToggleMenu.into(),
        ("esc" | "escape", true) => Command::CloseMenu.into(),
        ("d" | "theme", true) => Command::ToggleTheme.into(),
        ("c", true) => Command::ToggleClockView.into(),
        ("enter" | "n" | "next", true) => Command::AdvanceRound.into(),
        ("1" | "pomodoro", true) => Command::SwitchMode(AppMode::Pomodoro).into(),
        ("2" | "timer", true) => Command::SwitchMode(AppMode::Timer).into(),
        ("3" | "clock", true) => Command::SwitchMode(AppMode::Clock).into(),

        ("work" | "break", true) => return Err(CommandError::MissingValue(keyword.clone())),
        ("work" | "break" | "timer", false) => {
            let field = DurationField::from_name(&keyword)
                .ok_or_else(|| CommandError::UnknownCommand(trimmed.to_string()))?;
            Command::EditDuration(field, rest.to_string()).into()
        }

        ("preset", true) => return Err(CommandError::MissingValue(keyword.clone())),
        ("preset", false) => Command::ApplyPreset(parse_preset(rest)?).into(),

        ("tz" | "timezone", true) => return Err(CommandError::MissingValue(keyword.clone())),
        ("tz" | "timezone", false) => Command::SetTimezone(rest.to_string()).into(),

        ("status" | "s", true) => InputAction::Show(ShowRequest::Status),
        ("json", true) => InputAction::Show(ShowRequest::Json),
        ("help" | "?" | "h", true) => InputAction::Show(ShowRequest::Help),
        ("zones" | "timezones", true) => InputAction::Show(ShowRequest::Timezones),

        ("q" | "quit" | "exit", true) => InputAction::Quit,

        _ => return Err(CommandError::UnknownCommand(trimmed.to_string())),
    };

    Ok(action)
}

/// Parses `NAME` or `WORK BREAK`.
fn parse_preset(text: &str) -> Result<PresetChoice, CommandError> {
    if let Some(preset) = Preset::from_name(text) {
        return Ok(PresetChoice::Named(preset));
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [work, brk] if work.chars().all(|c| c.is_ascii_digit() || c == '-') => {
            let work = Durations::parse_minutes(work)?;
            let brk = Durations::parse_minutes(brk)?;
            Ok(PresetChoice::Custom { work, brk })
        }
        _ => Err(CommandError::UnknownPreset(text.to_string())),
    }
}

/// Reads lines from `reader` and forwards them to the session.
///
/// Stops after `quit` or end of input, sending [`SessionMessage::Shutdown`]
/// either way. Also stops quietly if the session is already gone.
pub async fn pump_lines<R>(reader: R, tx: mpsc::UnboundedSender<SessionMessage>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let message = match parse_line(&line) {
            Ok(InputAction::Command(command)) => SessionMessage::Command(command),
            Ok(InputAction::Show(request)) => SessionMessage::Show(request),
            Ok(InputAction::Quit) => break,
            Err(e) => {
                tracing::debug!(line = %line, error = %e, "input rejected");
                Display::show_error(&format!("{} (type `help` for commands)", e));
                continue;
            }
        };

        if tx.send(message).is_err() {
            tracing::debug!("session closed, input reader stopping");
            return Ok(());
        }
    }

    // The session may already have stopped; nothing to do then.
    let _ = tx.send(SessionMessage::Shutdown);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DurationError;

    fn command(line: &str) -> Command {
        match parse_line(line) {
            Ok(InputAction::Command(command)) => command,
            other => panic!("Expected command for {:?}, got {:?}", line, other),
        }
    }

    // ------------------------------------------------------------------------
    // Key binding Tests
    // ------------------------------------------------------------------------

    mod key_tests {
        use super::*;

        #[test]
        fn test_empty_line_toggles() {
            assert_eq!(command(""), Command::ToggleRunPause);
            assert_eq!(command("   "), Command::ToggleRunPause);
            assert_eq!(command("space"), Command::ToggleRunPause);
        }

        #[test]
        fn test_single_keys() {
            assert_eq!(command("r"), Command::ResetCurrent);
            assert_eq!(command("m"), Command::ToggleMenu);
            assert_eq!(command("esc"), Command::CloseMenu);
            assert_eq!(command("d"), Command::ToggleTheme);
            assert_eq!(command("c"), Command::ToggleClockView);
            assert_eq!(command("n"), Command::AdvanceRound);
            assert_eq!(command("enter"), Command::AdvanceRound);
            assert_eq!(command("rounds"), Command::ResetRounds);
        }

        #[test]
        fn test_keys_are_case_insensitive() {
            assert_eq!(command("R"), Command::ResetCurrent);
            assert_eq!(command("ESC"), Command::CloseMenu);
        }

        #[test]
        fn test_mode_keys() {
            assert_eq!(command("1"), Command::SwitchMode(AppMode::Pomodoro));
            assert_eq!(command("2"), Command::SwitchMode(AppMode::Timer));
            assert_eq!(command("3"), Command::SwitchMode(AppMode::Clock));
            assert_eq!(command("timer"), Command::SwitchMode(AppMode::Timer));
            assert_eq!(command("clock"), Command::SwitchMode(AppMode::Clock));
        }

        #[test]
        fn test_show_and_quit() {
            assert_eq!(parse_line("status"), Ok(InputAction::Show(ShowRequest::Status)));
            assert_eq!(parse_line("json"), Ok(InputAction::Show(ShowRequest::Json)));
            assert_eq!(parse_line("?"), Ok(InputAction::Show(ShowRequest::Help)));
            assert_eq!(parse_line("zones"), Ok(InputAction::Show(ShowRequest::Timezones)));
            assert_eq!(parse_line("q"), Ok(InputAction::Quit));
            assert_eq!(parse_line("quit"), Ok(InputAction::Quit));
        }

        #[test]
        fn test_unknown_input() {
            assert_eq!(
                parse_line("jump"),
                Err(CommandError::UnknownCommand("jump".to_string()))
            );
            assert!(parse_line("r now").is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Value command Tests
    // ------------------------------------------------------------------------

    mod value_tests {
        use super::*;

        #[test]
        fn test_duration_edits_keep_raw_text() {
            assert_eq!(
                command("work 30"),
                Command::EditDuration(DurationField::Work, "30".to_string())
            );
            assert_eq!(
                command("break abc"),
                Command::EditDuration(DurationField::Break, "abc".to_string())
            );
            assert_eq!(
                command("TIMER  90 "),
                Command::EditDuration(DurationField::Timer, "90".to_string())
            );
        }

        #[test]
        fn test_duration_without_value() {
            assert_eq!(
                parse_line("work"),
                Err(CommandError::MissingValue("work".to_string()))
            );
            assert_eq!(
                parse_line("break"),
                Err(CommandError::MissingValue("break".to_string()))
            );
        }

        #[test]
        fn test_named_presets() {
            assert_eq!(
                command("preset classic"),
                Command::ApplyPreset(PresetChoice::Named(Preset::Classic))
            );
            assert_eq!(
                command("preset deep work"),
                Command::ApplyPreset(PresetChoice::Named(Preset::DeepWork))
            );
        }

        #[test]
        fn test_custom_preset() {
            assert_eq!(
                command("preset 30 7"),
                Command::ApplyPreset(PresetChoice::Custom { work: 30, brk: 7 })
            );
        }

        #[test]
        fn test_custom_preset_out_of_range() {
            assert_eq!(
                parse_line("preset 0 5"),
                Err(CommandError::Duration(DurationError::OutOfRange(0)))
            );
        }

        #[test]
        fn test_unknown_preset() {
            assert_eq!(
                parse_line("preset marathon"),
                Err(CommandError::UnknownPreset("marathon".to_string()))
            );
            assert_eq!(
                parse_line("preset"),
                Err(CommandError::MissingValue("preset".to_string()))
            );
        }

        #[test]
        fn test_timezone_keeps_case() {
            assert_eq!(
                command("tz Asia/Tokyo"),
                Command::SetTimezone("Asia/Tokyo".to_string())
            );
            assert_eq!(
                command("timezone America/New_York"),
                Command::SetTimezone("America/New_York".to_string())
            );
            assert!(parse_line("tz").is_err());
        }
    }

    // ------------------------------------------------------------------------
    // pump_lines Tests
    // ------------------------------------------------------------------------

    mod pump_tests {
        use super::*;

        async fn pump(input: &'static str) -> Vec<SessionMessage> {
            let (tx, mut rx) = mpsc::unbounded_channel();
            pump_lines(input.as_bytes(), tx).await.unwrap();

            let mut messages = Vec::new();
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
            messages
        }

        #[tokio::test]
        async fn test_forwards_until_quit() {
            let messages = pump("r\nstatus\nq\nm\n").await;
            assert_eq!(
                messages,
                vec![
                    SessionMessage::Command(Command::ResetCurrent),
                    SessionMessage::Show(ShowRequest::Status),
                    SessionMessage::Shutdown,
                ]
            );
        }

        #[tokio::test]
        async fn test_eof_shuts_down() {
            let messages = pump("3\n").await;
            assert_eq!(
                messages,
                vec![
                    SessionMessage::Command(Command::SwitchMode(AppMode::Clock)),
                    SessionMessage::Shutdown,
                ]
            );
        }

        #[tokio::test]
        async fn test_skips_unknown_lines() {
            let messages = pump("bogus\nd\n").await;
            assert_eq!(
                messages,
                vec![
                    SessionMessage::Command(Command::ToggleTheme),
                    SessionMessage::Shutdown,
                ]
            );
        }

        #[tokio::test]
        async fn test_closed_session_stops_reader() {
            let (tx, rx) = mpsc::unbounded_channel();
            drop(rx);
            assert!(pump_lines("r\nr\n".as_bytes(), tx).await.is_ok());
        }
    }
}
