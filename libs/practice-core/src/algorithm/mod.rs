//! Spaced repetition scheduling.

pub mod doubling;

use crate::error::{Result, ValidationError};
use crate::types::{ReviewEvent, ReviewMetadata, ReviewOutcome, ReviewStatus};
use chrono::{DateTime, Duration, Utc};

/// Result of scheduling a problem after a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingResult {
    pub metadata: ReviewMetadata,
    pub event: ReviewEvent,
    /// New value for the problem's cached display flag.
    pub status: ReviewStatus,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Metadata for a problem that has never been reviewed.
    fn initial_metadata(&self) -> ReviewMetadata {
        ReviewMetadata::default()
    }

    /// Interval in days that follows `current_interval` for the given outcome.
    fn next_interval(&self, current_interval: u32, outcome: ReviewOutcome) -> u32;

    /// Apply one review to a problem's metadata.
    ///
    /// `metadata` is `None` for a problem that has never been reviewed, in which
    /// case `initial_metadata` is used as the starting point. Ownership of
    /// `problem_id` must already have been checked by the caller.
    fn record_review(
        &self,
        problem_id: i64,
        metadata: Option<&ReviewMetadata>,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        let current = match metadata {
            Some(m) => m.clone(),
            None => self.initial_metadata(),
        };
        current.validate()?;

        let total_reviews = current
            .total_reviews
            .checked_add(1)
            .ok_or(ValidationError::CounterOverflow(current.total_reviews))?;

        let interval_days = self.next_interval(current.interval_days, outcome);
        let next_due = now + Duration::days(i64::from(interval_days));

        // Both counters are bounded by total_reviews, so they cannot overflow here.
        let (times_remembered, times_forgot) = match outcome {
            ReviewOutcome::Remembered => (current.times_remembered + 1, current.times_forgot),
            ReviewOutcome::Forgot => (current.times_remembered, current.times_forgot + 1),
        };

        Ok(SchedulingResult {
            metadata: ReviewMetadata {
                total_reviews,
                times_remembered,
                times_forgot,
                last_reviewed: Some(now),
                next_review_due: Some(next_due),
                interval_days,
            },
            event: ReviewEvent {
                problem_id,
                outcome,
                reviewed_at: now,
                next_review_date: next_due,
            },
            status: ReviewStatus::from(outcome),
        })
    }
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "doubling" => Some(Box::new(doubling::Doubling::default())),
        _ => None,
    }
}
