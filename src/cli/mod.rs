//! CLI module for pomoclock.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `input`: Text bindings from stdin lines to widget commands
//! - `display`: Output formatting and the terminal renderer

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{Display, TerminalRenderer};
pub use input::{parse_line, pump_lines, InputAction};
