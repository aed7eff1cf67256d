//! Command surface of the widget.
//!
//! Commands are plain values, independent of how they are bound to keys,
//! buttons or text. Each input binding maps 1:1 to one of these.

use std::fmt;

use crate::types::{AppMode, DurationField, Preset};

/// Work/break pair for [`Command::ApplyPreset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetChoice {
    /// One of the named presets
    Named(Preset),
    /// Arbitrary minutes
    Custom {
        /// Work minutes
        work: u32,
        /// Break minutes
        brk: u32,
    },
}

impl PresetChoice {
    /// Returns (work, break) minutes.
    pub fn minutes(&self) -> (u32, u32) {
        match self {
            PresetChoice::Named(preset) => preset.minutes(),
            PresetChoice::Custom { work, brk } => (*work, *brk),
        }
    }
}

/// Everything a user can ask the widget to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or pause; reloads the phase when the countdown is at zero
    ToggleRunPause,
    /// Reload the active phase's duration
    ResetCurrent,
    /// Back to round 1, Work phase
    ResetRounds,
    /// Enter another mode
    SwitchMode(AppMode),
    /// Confirm a completed phase and move to the next one
    AdvanceRound,
    /// Open or close the settings menu
    ToggleMenu,
    /// Close the settings menu
    CloseMenu,
    /// Switch between light and dark
    ToggleTheme,
    /// Show or hide the clock face
    ToggleClockView,
    /// Edit a duration from raw text
    EditDuration(DurationField, String),
    /// Set work and break together
    ApplyPreset(PresetChoice),
    /// Select the clock's timezone
    SetTimezone(String),
}

impl Command {
    /// Returns true for commands that an open menu swallows.
    pub fn is_blocked_by_menu(&self) -> bool {
        matches!(self, Command::ToggleRunPause | Command::ResetCurrent)
    }

    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleRunPause => "toggle_run_pause",
            Command::ResetCurrent => "reset_current",
            Command::ResetRounds => "reset_rounds",
            Command::SwitchMode(_) => "switch_mode",
            Command::AdvanceRound => "advance_round",
            Command::ToggleMenu => "toggle_menu",
            Command::CloseMenu => "close_menu",
            Command::ToggleTheme => "toggle_theme",
            Command::ToggleClockView => "toggle_clock_view",
            Command::EditDuration(_, _) => "edit_duration",
            Command::ApplyPreset(_) => "apply_preset",
            Command::SetTimezone(_) => "set_timezone",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SwitchMode(mode) => write!(f, "switch_mode({})", mode.as_str()),
            Command::EditDuration(field, raw) => {
                write!(f, "edit_duration({}, {:?})", field.as_str(), raw)
            }
            Command::ApplyPreset(choice) => {
                let (work, brk) = choice.minutes();
                write!(f, "apply_preset({}, {})", work, brk)
            }
            Command::SetTimezone(tz) => write!(f, "set_timezone({})", tz),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_blocks_only_countdown_controls() {
        assert!(Command::ToggleRunPause.is_blocked_by_menu());
        assert!(Command::ResetCurrent.is_blocked_by_menu());
        assert!(!Command::ToggleMenu.is_blocked_by_menu());
        assert!(!Command::AdvanceRound.is_blocked_by_menu());
        assert!(!Command::SwitchMode(AppMode::Timer).is_blocked_by_menu());
    }

    #[test]
    fn test_preset_choice_minutes() {
        assert_eq!(PresetChoice::Named(Preset::Long).minutes(), (50, 10));
        assert_eq!(PresetChoice::Custom { work: 30, brk: 7 }.minutes(), (30, 7));
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::ToggleRunPause.to_string(), "toggle_run_pause");
        assert_eq!(
            Command::SwitchMode(AppMode::Clock).to_string(),
            "switch_mode(clock)"
        );
        assert_eq!(
            Command::EditDuration(DurationField::Work, "30".into()).to_string(),
            "edit_duration(work, \"30\")"
        );
        assert_eq!(
            Command::ApplyPreset(PresetChoice::Named(Preset::Short)).to_string(),
            "apply_preset(15, 3)"
        );
    }
}
