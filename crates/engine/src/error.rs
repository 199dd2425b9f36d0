//! Error types for cron parsing, conversion and synthesis.

use thiserror::Error;

use crate::expression::CronField;

/// Errors produced while parsing a 5-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronParseError {
    /// Fewer than five whitespace-separated fields.
    #[error("Invalid cron expression")]
    TooFewFields { found: usize },

    #[error("expected exactly 5 cron fields, found {found}")]
    TooManyFields { found: usize },

    #[error("unsupported {field} syntax {token:?}: only single integers can be converted")]
    UnsupportedSyntax { field: CronField, token: String },

    #[error("{field} field {token:?} is not an integer")]
    NotAnInteger { field: CronField, token: String },

    #[error("{field} value {value} is out of range {min}-{max}")]
    OutOfRange {
        field: CronField,
        value: i64,
        min: u8,
        max: u8,
    },
}

/// Errors produced by timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] CronParseError),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("no calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u8, day: u8 },
}

/// Errors produced by the holiday-safe and repetitive-job synthesizers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),

    #[error("invalid holiday date {0:?}: expected MM-DD")]
    InvalidHoliday(String),

    #[error("unknown schedule type {0:?}")]
    UnknownScheduleType(String),

    #[error("unknown interval unit {0:?}")]
    UnknownUnit(String),

    #[error("command must not be empty")]
    EmptyCommand,

    #[error("script name must not be empty")]
    EmptyScriptName,

    #[error("interval must be at least 1")]
    ZeroInterval,

    #[error("repetitions must be between 1 and {max}, got {got}")]
    Repetitions { got: u32, max: u32 },
}

/// Errors from validating an expression against the `cron` crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid cron expression {expr:?}: {reason}")]
    Invalid { expr: String, reason: String },
}
