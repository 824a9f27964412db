use chrono::NaiveDateTime;
use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid event interval for '{id}': start {start} is not before end {end}")]
    InvalidInterval {
        id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Reasons a recurrence rule cannot be resolved into a canonical rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unknown recurrence frequency: {0}")]
    UnknownFrequency(String),

    #[error("Unknown recurrence end type: {0}")]
    UnknownEndType(String),

    #[error("Recurrence interval must be positive, got {0}")]
    NonPositiveInterval(i64),

    #[error("Occurrence count must be positive, got {0:?}")]
    NonPositiveCount(Option<i64>),

    #[error("End date missing or malformed: {0:?}")]
    InvalidEndDate(Option<String>),

    #[error("Weekday index out of range: {0}")]
    InvalidWeekday(i64),

    #[error("Exception date is not a yyyy-MM-dd key: {0}")]
    InvalidException(String),
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;
