//! Error types for practice-core.

use thiserror::Error;

/// Result type alias defaulting to ValidationError.
pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// Rejected input to the scheduling engine or the problem catalog.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid review outcome '{0}', expected 'remembered' or 'forgot'")]
    InvalidOutcome(String),

    #[error("interval must be at least 1 day, got {0}")]
    InvalidInterval(i64),

    #[error("{field} must not be negative, got {value}")]
    NegativeCount { field: &'static str, value: i64 },

    #[error("total_reviews {total} does not match {remembered} remembered + {forgot} forgot")]
    InconsistentCounters {
        total: u32,
        remembered: u32,
        forgot: u32,
    },

    #[error("review counter overflow at {0} reviews")]
    CounterOverflow(u32),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid url '{0}': expected an absolute http or https URL")]
    InvalidUrl(String),

    #[error("invalid difficulty '{0}', expected easy, medium or hard")]
    InvalidDifficulty(String),

    #[error("invalid review status value {0}")]
    InvalidStatus(i16),
}

/// Errors that can occur while parsing a starter problem list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("problem list contains no titles")]
    EmptyList,

    #[error("title too long at line {line} ({len} characters)")]
    TitleTooLong { line: usize, len: usize },
}
