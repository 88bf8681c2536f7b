//! Core types for the practice tracker.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Outcome of a single review attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Remembered,
    Forgot,
}

impl ReviewOutcome {
    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remembered => "remembered",
            Self::Forgot => "forgot",
        }
    }
}

impl FromStr for ReviewOutcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remembered" => Ok(Self::Remembered),
            "forgot" => Ok(Self::Forgot),
            other => Err(ValidationError::InvalidOutcome(other.to_string())),
        }
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display flag cached on a problem. Derived from the latest review, never
/// consulted for scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Forgot,
    #[default]
    Unreviewed,
    Remembered,
}

impl ReviewStatus {
    /// Convert to the stored tri-state value (-1, 0, 1).
    pub fn to_value(self) -> i16 {
        match self {
            Self::Forgot => -1,
            Self::Unreviewed => 0,
            Self::Remembered => 1,
        }
    }

    /// Create from the stored tri-state value.
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            -1 => Some(Self::Forgot),
            0 => Some(Self::Unreviewed),
            1 => Some(Self::Remembered),
            _ => None,
        }
    }
}

impl From<ReviewOutcome> for ReviewStatus {
    fn from(outcome: ReviewOutcome) -> Self {
        match outcome {
            ReviewOutcome::Remembered => Self::Remembered,
            ReviewOutcome::Forgot => Self::Forgot,
        }
    }
}

/// Problem difficulty as labelled by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ValidationError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// Aggregate review statistics and schedule for one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMetadata {
    pub total_reviews: u32,
    pub times_remembered: u32,
    pub times_forgot: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_due: Option<DateTime<Utc>>,
    pub interval_days: u32,
}

impl Default for ReviewMetadata {
    fn default() -> Self {
        Self {
            total_reviews: 0,
            times_remembered: 0,
            times_forgot: 0,
            last_reviewed: None,
            next_review_due: None,
            interval_days: 1,
        }
    }
}

impl ReviewMetadata {
    /// Check the interval and counter invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_days < 1 {
            return Err(ValidationError::InvalidInterval(self.interval_days as i64));
        }
        let counted = self.times_remembered.checked_add(self.times_forgot);
        if counted != Some(self.total_reviews) {
            return Err(ValidationError::InconsistentCounters {
                total: self.total_reviews,
                remembered: self.times_remembered,
                forgot: self.times_forgot,
            });
        }
        Ok(())
    }

    /// A problem is due when it has never been scheduled or its due date has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_due {
            Some(due) => due <= now,
            None => true,
        }
    }
}

/// One immutable entry of the review history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub problem_id: i64,
    #[serde(rename = "result")]
    pub outcome: ReviewOutcome,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
}

/// Dashboard aggregates for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_problems: usize,
    pub total_reviews: usize,
    /// Percentage in `[0, 100]`.
    pub success_rate: f64,
    pub streak_days: usize,
}
