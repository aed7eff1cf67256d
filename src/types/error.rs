//! Input error types.
//!
//! Every error here describes user input that was rejected. The state that
//! the input targeted is left untouched, so callers are free to log the
//! error and carry on.

use thiserror::Error;

use super::{MAX_MINUTES, MIN_MINUTES};

/// Errors produced when a duration value is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The raw value is not an integer.
    #[error("'{0}' is not a whole number of minutes")]
    NotANumber(String),

    /// The value is outside the accepted range.
    #[error("{0} minutes is outside {MIN_MINUTES}-{MAX_MINUTES}")]
    OutOfRange(i64),
}

impl DurationError {
    /// Returns true if the value could not be parsed at all.
    #[must_use]
    pub fn is_not_a_number(&self) -> bool {
        matches!(self, Self::NotANumber(_))
    }

    /// Returns true if the value parsed but fell outside the range.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
}

/// Errors produced when a command cannot be applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A duration edit or preset carried an invalid value.
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// The named preset does not exist.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// The text could not be mapped to a command.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A command was given without a value it requires.
    #[error("'{0}' needs a value")]
    MissingValue(String),
}
