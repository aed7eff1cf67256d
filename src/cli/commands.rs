//! Command definitions for the pomoclock CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{AppMode, Theme, WidgetConfig, MAX_MINUTES, MIN_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro timer, countdown and world clock in one terminal widget
#[derive(Parser, Debug)]
#[command(
    name = "pomoclock",
    version,
    about = "Pomodoro timer, countdown timer and timezone clock",
    long_about = "A small terminal widget with three modes: work/break intervals,\n\
                  a freeform countdown and a live timezone clock.\n\
                  Type `help` inside a running session for the key bindings.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the widget, reading commands from stdin
    Run(RunArgs),

    /// List the timezones offered by the clock
    Timezones,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work duration in minutes (1-1440)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_MINUTES)..=i64::from(MAX_MINUTES))
    )]
    pub work: u32,

    /// Break duration in minutes (1-1440)
    #[arg(
        short,
        long = "break",
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_MINUTES)..=i64::from(MAX_MINUTES))
    )]
    pub break_time: u32,

    /// Timer mode duration in minutes (1-1440)
    #[arg(
        short,
        long,
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_MINUTES)..=i64::from(MAX_MINUTES))
    )]
    pub timer: u32,

    /// Mode to start in
    #[arg(short, long, value_enum, default_value_t = AppMode::Pomodoro)]
    pub mode: AppMode,

    /// IANA timezone for the clock (defaults to $TZ, then local time)
    #[arg(short = 'z', long)]
    pub timezone: Option<String>,

    /// Color theme
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    pub theme: Theme,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            work: 25,
            break_time: 5,
            timer: 10,
            mode: AppMode::Pomodoro,
            timezone: None,
            theme: Theme::Light,
        }
    }
}

impl RunArgs {
    /// Builds the session configuration from the parsed flags.
    pub fn to_config(&self) -> WidgetConfig {
        let config = WidgetConfig::default()
            .with_work_minutes(self.work)
            .with_break_minutes(self.break_time)
            .with_timer_minutes(self.timer)
            .with_mode(self.mode)
            .with_theme(self.theme);

        match &self.timezone {
            Some(timezone) => config.with_timezone(timezone.trim()),
            None => config,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
