//! Core data types for the widget.
//!
//! This module defines the data structures used for:
//! - Application mode and Pomodoro phase
//! - User-editable durations with validation
//! - Presets, theme and view flags
//! - Session configuration
//! - Serializable status snapshots

pub mod error;

use serde::{Deserialize, Serialize};

pub use error::{CommandError, DurationError};

/// Smallest accepted duration in minutes.
pub const MIN_MINUTES: u32 = 1;

/// Largest accepted duration in minutes (24 hours).
pub const MAX_MINUTES: u32 = 1440;

// ============================================================================
// AppMode
// ============================================================================

/// The three interchangeable display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    /// Work/break intervals
    #[default]
    Pomodoro,
    /// Freeform countdown
    Timer,
    /// Live timezone clock
    Clock,
}

impl AppMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Pomodoro => "pomodoro",
            AppMode::Timer => "timer",
            AppMode::Clock => "clock",
        }
    }

    /// Returns the upper-case label shown in the mode bar.
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Pomodoro => "POMODORO",
            AppMode::Timer => "TIMER",
            AppMode::Clock => "CLOCK",
        }
    }

    /// Returns true if the mode displays a countdown.
    pub fn has_countdown(&self) -> bool {
        !matches!(self, AppMode::Clock)
    }
}

// ============================================================================
// PomodoroPhase
// ============================================================================

/// Phase of a Pomodoro round. Only meaningful in [`AppMode::Pomodoro`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    /// Focused work
    #[default]
    Work,
    /// Rest between work phases
    Break,
}

impl PomodoroPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "work",
            PomodoroPhase::Break => "break",
        }
    }

    /// Returns the upper-case label.
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "WORK",
            PomodoroPhase::Break => "BREAK",
        }
    }

    /// Returns the duration field that feeds this phase.
    pub fn duration_field(&self) -> DurationField {
        match self {
            PomodoroPhase::Work => DurationField::Work,
            PomodoroPhase::Break => DurationField::Break,
        }
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Identifies one of the editable duration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationField {
    /// Pomodoro work phase length
    Work,
    /// Pomodoro break phase length
    Break,
    /// Timer mode length
    Timer,
}

impl DurationField {
    /// Returns the string representation of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationField::Work => "work",
            DurationField::Break => "break",
            DurationField::Timer => "timer",
        }
    }

    /// Looks a field up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "work" => Some(DurationField::Work),
            "break" => Some(DurationField::Break),
            "timer" => Some(DurationField::Timer),
            _ => None,
        }
    }
}

/// User-editable durations in minutes.
///
/// Each value always lies in `MIN_MINUTES..=MAX_MINUTES`. Setters validate
/// first and leave the previous value in place when validation fails, and
/// deserialization goes through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DurationMinutes")]
pub struct Durations {
    work_minutes: u32,
    break_minutes: u32,
    timer_minutes: u32,
}

/// Unchecked wire form of [`Durations`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DurationMinutes {
    work_minutes: u32,
    break_minutes: u32,
    timer_minutes: u32,
}

impl TryFrom<DurationMinutes> for Durations {
    type Error = DurationError;

    fn try_from(raw: DurationMinutes) -> Result<Self, Self::Error> {
        Durations::new(raw.work_minutes, raw.break_minutes, raw.timer_minutes)
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            timer_minutes: 10,
        }
    }
}

impl Durations {
    /// Creates a validated set of durations.
    pub fn new(work: u32, brk: u32, timer: u32) -> Result<Self, DurationError> {
        Ok(Self {
            work_minutes: Self::check_minutes(i64::from(work))?,
            break_minutes: Self::check_minutes(i64::from(brk))?,
            timer_minutes: Self::check_minutes(i64::from(timer))?,
        })
    }

    /// Parses raw user text as a minute count.
    ///
    /// The text is trimmed and must be a base-10 integer inside the range.
    pub fn parse_minutes(raw: &str) -> Result<u32, DurationError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| DurationError::NotANumber(trimmed.to_string()))?;
        Self::check_minutes(value)
    }

    /// Checks that a minute count is inside the accepted range.
    pub fn check_minutes(value: i64) -> Result<u32, DurationError> {
        if value < i64::from(MIN_MINUTES) || value > i64::from(MAX_MINUTES) {
            return Err(DurationError::OutOfRange(value));
        }
        // In range, so the conversion cannot fail.
        u32::try_from(value).map_err(|_| DurationError::OutOfRange(value))
    }

    /// Returns the minutes stored for a field.
    pub fn minutes(&self, field: DurationField) -> u32 {
        match field {
            DurationField::Work => self.work_minutes,
            DurationField::Break => self.break_minutes,
            DurationField::Timer => self.timer_minutes,
        }
    }

    /// Returns the length of a field in seconds.
    pub fn seconds(&self, field: DurationField) -> u32 {
        self.minutes(field) * 60
    }

    /// Returns the work duration in minutes.
    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    /// Returns the break duration in minutes.
    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Returns the timer duration in minutes.
    pub fn timer_minutes(&self) -> u32 {
        self.timer_minutes
    }

    /// Parses and stores a field. Returns the stored minutes.
    pub fn set_raw(&mut self, field: DurationField, raw: &str) -> Result<u32, DurationError> {
        let minutes = Self::parse_minutes(raw)?;
        self.store(field, minutes);
        Ok(minutes)
    }

    /// Sets work and break together; neither changes unless both are valid.
    pub fn set_work_and_break(&mut self, work: u32, brk: u32) -> Result<(), DurationError> {
        let work = Self::check_minutes(i64::from(work))?;
        let brk = Self::check_minutes(i64::from(brk))?;
        self.work_minutes = work;
        self.break_minutes = brk;
        Ok(())
    }

    fn store(&mut self, field: DurationField, minutes: u32) {
        match field {
            DurationField::Work => self.work_minutes = minutes,
            DurationField::Break => self.break_minutes = minutes,
            DurationField::Timer => self.timer_minutes = minutes,
        }
    }
}

// ============================================================================
// Preset
// ============================================================================

/// Named work/break combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 25 / 5
    Classic,
    /// 50 / 10
    Long,
    /// 15 / 3
    Short,
    /// 45 / 15
    DeepWork,
}

impl Preset {
    /// All presets in menu order.
    pub const ALL: [Preset; 4] = [Preset::Classic, Preset::Long, Preset::Short, Preset::DeepWork];

    /// Returns the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Classic => "CLASSIC",
            Preset::Long => "LONG",
            Preset::Short => "SHORT",
            Preset::DeepWork => "DEEP WORK",
        }
    }

    /// Returns (work, break) minutes.
    pub fn minutes(&self) -> (u32, u32) {
        match self {
            Preset::Classic => (25, 5),
            Preset::Long => (50, 10),
            Preset::Short => (15, 3),
            Preset::DeepWork => (45, 15),
        }
    }

    /// Looks a preset up by name, ignoring case, spaces, dashes and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "classic" | "class" => Some(Preset::Classic),
            "long" => Some(Preset::Long),
            "short" => Some(Preset::Short),
            "deepwork" | "deep" => Some(Preset::DeepWork),
            _ => None,
        }
    }
}

// ============================================================================
// Theme / ViewState
// ============================================================================

/// Color theme flag. Rendering is up to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Returns the string representation of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Presentation flags toggled by commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Settings menu is open
    pub menu_open: bool,
    /// Active theme
    pub theme: Theme,
    /// Clock face is shown around the digits
    pub show_clock: bool,
}

// ============================================================================
// WidgetConfig
// ============================================================================

/// Timezone sentinel that formats as the system's local time.
pub const LOCAL_TIMEZONE: &str = "Local";

/// Initial settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Initial durations
    pub durations: Durations,
    /// Mode entered at startup
    pub mode: AppMode,
    /// IANA timezone for the clock
    pub timezone: String,
    /// Initial theme
    pub theme: Theme,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            mode: AppMode::default(),
            timezone: default_timezone(),
            theme: Theme::default(),
        }
    }
}

/// Returns `TZ` from the environment, or [`LOCAL_TIMEZONE`].
pub fn default_timezone() -> String {
    std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| LOCAL_TIMEZONE.to_string())
}

impl WidgetConfig {
    /// Sets the work duration in minutes.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.durations.work_minutes = minutes;
        self
    }

    /// Sets the break duration in minutes.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.durations.break_minutes = minutes;
        self
    }

    /// Sets the timer duration in minutes.
    pub fn with_timer_minutes(mut self, minutes: u32) -> Self {
        self.durations.timer_minutes = minutes;
        self
    }

    /// Sets the startup mode.
    pub fn with_mode(mut self, mode: AppMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the clock timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Sets the startup theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), DurationError> {
        Durations::new(
            self.durations.work_minutes,
            self.durations.break_minutes,
            self.durations.timer_minutes,
        )
        .map(|_| ())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything needed to draw the widget at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Active mode
    pub mode: AppMode,
    /// Pomodoro phase (only in Pomodoro mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<PomodoroPhase>,
    /// Current round
    pub round: u32,
    /// Remaining countdown seconds
    pub remaining_seconds: u32,
    /// Countdown is running
    pub is_running: bool,
    /// Countdown reached zero
    pub is_completed: bool,
    /// Formatted time for the active mode
    pub display: String,
    /// Current durations
    pub durations: Durations,
    /// Clock timezone
    pub timezone: String,
    /// Presentation flags
    pub view: ViewState,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod app_mode_tests {
        use super::*;

        #[test]
        fn test_default_is_pomodoro() {
            assert_eq!(AppMode::default(), AppMode::Pomodoro);
        }

        #[test]
        fn test_as_str_and_label() {
            assert_eq!(AppMode::Pomodoro.as_str(), "pomodoro");
            assert_eq!(AppMode::Timer.label(), "TIMER");
            assert_eq!(AppMode::Clock.label(), "CLOCK");
        }

        #[test]
        fn test_has_countdown() {
            assert!(AppMode::Pomodoro.has_countdown());
            assert!(AppMode::Timer.has_countdown());
            assert!(!AppMode::Clock.has_countdown());
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&AppMode::Clock).unwrap();
            assert_eq!(json, "\"clock\"");
        }
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_work() {
            assert_eq!(PomodoroPhase::default(), PomodoroPhase::Work);
        }

        #[test]
        fn test_duration_field() {
            assert_eq!(PomodoroPhase::Work.duration_field(), DurationField::Work);
            assert_eq!(PomodoroPhase::Break.duration_field(), DurationField::Break);
        }
    }

    mod durations_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let durations = Durations::default();
            assert_eq!(durations.work_minutes(), 25);
            assert_eq!(durations.break_minutes(), 5);
            assert_eq!(durations.timer_minutes(), 10);
            assert_eq!(durations.seconds(DurationField::Work), 1500);
        }

        #[test]
        fn test_parse_minutes_accepts_bounds() {
            assert_eq!(Durations::parse_minutes("1"), Ok(1));
            assert_eq!(Durations::parse_minutes("1440"), Ok(1440));
            assert_eq!(Durations::parse_minutes("  30 "), Ok(30));
        }

        #[test]
        fn test_parse_minutes_rejects_out_of_range() {
            assert_eq!(Durations::parse_minutes("0"), Err(DurationError::OutOfRange(0)));
            assert_eq!(
                Durations::parse_minutes("1441"),
                Err(DurationError::OutOfRange(1441))
            );
            assert_eq!(Durations::parse_minutes("-5"), Err(DurationError::OutOfRange(-5)));
        }

        #[test]
        fn test_parse_minutes_rejects_non_numeric() {
            assert!(Durations::parse_minutes("abc").unwrap_err().is_not_a_number());
            assert!(Durations::parse_minutes("").unwrap_err().is_not_a_number());
            assert!(Durations::parse_minutes("25abc").unwrap_err().is_not_a_number());
            assert!(Durations::parse_minutes("2.5").unwrap_err().is_not_a_number());
        }

        #[test]
        fn test_set_raw_keeps_previous_on_error() {
            let mut durations = Durations::default();
            for raw in ["0", "1441", "abc"] {
                assert!(durations.set_raw(DurationField::Work, raw).is_err());
                assert_eq!(durations.work_minutes(), 25);
            }
            assert_eq!(durations.set_raw(DurationField::Work, "40"), Ok(40));
            assert_eq!(durations.work_minutes(), 40);
        }

        #[test]
        fn test_set_work_and_break_is_atomic() {
            let mut durations = Durations::default();
            assert!(durations.set_work_and_break(50, 0).is_err());
            assert_eq!(durations.work_minutes(), 25);
            assert_eq!(durations.break_minutes(), 5);

            durations.set_work_and_break(50, 10).unwrap();
            assert_eq!(durations.work_minutes(), 50);
            assert_eq!(durations.break_minutes(), 10);
        }

        #[test]
        fn test_new_validates_every_field() {
            assert!(Durations::new(1, 1, 1440).is_ok());
            assert!(Durations::new(25, 5, 0).is_err());
        }

        #[test]
        fn test_field_from_name() {
            assert_eq!(DurationField::from_name("Work"), Some(DurationField::Work));
            assert_eq!(DurationField::from_name("break"), Some(DurationField::Break));
            assert_eq!(DurationField::from_name("timer"), Some(DurationField::Timer));
            assert_eq!(DurationField::from_name("lunch"), None);
        }

        #[test]
        fn test_serialize_camel_case() {
            let json = serde_json::to_string(&Durations::default()).unwrap();
            assert_eq!(json, r#"{"workMinutes":25,"breakMinutes":5,"timerMinutes":10}"#);
        }

        #[test]
        fn test_deserialize_validates_range() {
            let durations: Durations =
                serde_json::from_str(r#"{"workMinutes":50,"breakMinutes":10,"timerMinutes":1440}"#)
                    .unwrap();
            assert_eq!(durations.work_minutes(), 50);
            assert_eq!(durations.timer_minutes(), 1440);

            let zero = serde_json::from_str::<Durations>(
                r#"{"workMinutes":0,"breakMinutes":5,"timerMinutes":10}"#,
            );
            assert!(zero.is_err());

            let too_long = serde_json::from_str::<Durations>(
                r#"{"workMinutes":25,"breakMinutes":5,"timerMinutes":1441}"#,
            );
            let message = too_long.unwrap_err().to_string();
            assert!(message.contains("1441 minutes is outside 1-1440"), "{message}");
        }

        #[test]
        fn test_config_deserialize_rejects_bad_durations() {
            let json = r#"{
                "durations": {"workMinutes": 25, "breakMinutes": 2000, "timerMinutes": 10},
                "mode": "timer",
                "timezone": "UTC",
                "theme": "dark"
            }"#;
            assert!(serde_json::from_str::<WidgetConfig>(json).is_err());
        }
    }

    mod preset_tests {
        use super::*;

        #[test]
        fn test_minutes() {
            assert_eq!(Preset::Classic.minutes(), (25, 5));
            assert_eq!(Preset::Long.minutes(), (50, 10));
            assert_eq!(Preset::Short.minutes(), (15, 3));
            assert_eq!(Preset::DeepWork.minutes(), (45, 15));
        }

        #[test]
        fn test_from_name() {
            assert_eq!(Preset::from_name("classic"), Some(Preset::Classic));
            assert_eq!(Preset::from_name("DEEP WORK"), Some(Preset::DeepWork));
            assert_eq!(Preset::from_name("deep-work"), Some(Preset::DeepWork));
            assert_eq!(Preset::from_name("turbo"), None);
        }

        #[test]
        fn test_all_presets_are_valid_durations() {
            for preset in Preset::ALL {
                let (work, brk) = preset.minutes();
                assert!(Durations::new(work, brk, 10).is_ok(), "{}", preset.name());
            }
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = WidgetConfig::default();
            assert_eq!(config.durations, Durations::default());
            assert_eq!(config.mode, AppMode::Pomodoro);
            assert_eq!(config.theme, Theme::Light);
            assert!(!config.timezone.is_empty());
        }

        #[test]
        fn test_builder_pattern() {
            let config = WidgetConfig::default()
                .with_work_minutes(30)
                .with_break_minutes(10)
                .with_timer_minutes(90)
                .with_mode(AppMode::Timer)
                .with_timezone("Asia/Tokyo")
                .with_theme(Theme::Dark);

            assert_eq!(config.durations.work_minutes(), 30);
            assert_eq!(config.durations.break_minutes(), 10);
            assert_eq!(config.durations.timer_minutes(), 90);
            assert_eq!(config.mode, AppMode::Timer);
            assert_eq!(config.timezone, "Asia/Tokyo");
            assert_eq!(config.theme, Theme::Dark);
        }

        #[test]
        fn test_validate() {
            assert!(WidgetConfig::default().validate().is_ok());
            assert!(WidgetConfig::default().with_work_minutes(1440).validate().is_ok());
            assert!(WidgetConfig::default().with_work_minutes(0).validate().is_err());
            assert!(WidgetConfig::default().with_timer_minutes(1441).validate().is_err());
        }

        #[test]
        fn test_theme_toggle() {
            assert_eq!(Theme::Light.toggled(), Theme::Dark);
            assert_eq!(Theme::Dark.toggled(), Theme::Light);
        }
    }
}
