//! Interval doubling with a hard reset on failure.
//!
//! A remembered review doubles the interval up to a cap; a forgotten review
//! puts the problem back to a one day interval. There is no ease factor.

use super::SpacedRepetitionAlgorithm;
use crate::types::ReviewOutcome;

/// Default upper bound on the review interval.
pub const MAX_INTERVAL_DAYS: u32 = 30;

/// Doubling scheduler with a configurable cap.
#[derive(Debug, Clone)]
pub struct Doubling {
    pub max_interval_days: u32,
}

impl Default for Doubling {
    fn default() -> Self {
        Self {
            max_interval_days: MAX_INTERVAL_DAYS,
        }
    }
}

impl SpacedRepetitionAlgorithm for Doubling {
    fn name(&self) -> &'static str {
        "doubling"
    }

    fn next_interval(&self, current_interval: u32, outcome: ReviewOutcome) -> u32 {
        match outcome {
            ReviewOutcome::Remembered => current_interval
                .saturating_mul(2)
                .clamp(1, self.max_interval_days.max(1)),
            ReviewOutcome::Forgot => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{ReviewMetadata, ReviewStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn remembered_doubles_with_cap() {
        let doubling = Doubling::default();
        for interval in 1..=30 {
            let state = ReviewMetadata {
                total_reviews: 4,
                times_remembered: 3,
                times_forgot: 1,
                interval_days: interval,
                ..Default::default()
            };
            let result = doubling
                .record_review(1, Some(&state), ReviewOutcome::Remembered, now())
                .unwrap();
            assert_eq!(result.metadata.interval_days, (interval * 2).min(30));
            assert_eq!(result.metadata.total_reviews, 5);
            assert_eq!(result.metadata.times_remembered, 4);
            assert_eq!(result.metadata.times_forgot, 1);
        }
    }

    #[test]
    fn forgot_resets_interval() {
        let doubling = Doubling::default();
        for interval in [1, 2, 7, 16, 30] {
            let state = ReviewMetadata {
                total_reviews: 2,
                times_remembered: 2,
                interval_days: interval,
                ..Default::default()
            };
            let result = doubling
                .record_review(1, Some(&state), ReviewOutcome::Forgot, now())
                .unwrap();
            assert_eq!(result.metadata.interval_days, 1);
            assert_eq!(result.metadata.times_forgot, 1);
            assert_eq!(result.metadata.times_remembered, 2);
            assert_eq!(result.metadata.total_reviews, 3);
        }
    }

    #[test]
    fn due_date_follows_interval() {
        let doubling = Doubling::default();
        let state = ReviewMetadata {
            total_reviews: 1,
            times_remembered: 1,
            interval_days: 4,
            ..Default::default()
        };
        let result = doubling
            .record_review(9, Some(&state), ReviewOutcome::Remembered, now())
            .unwrap();
        assert_eq!(result.metadata.next_review_due, Some(now() + Duration::days(8)));
        assert_eq!(result.metadata.last_reviewed, Some(now()));
        assert_eq!(result.event.next_review_date, now() + Duration::days(8));
        assert_eq!(result.event.reviewed_at, now());
        assert_eq!(result.event.problem_id, 9);
    }

    #[test]
    fn repeated_success_sequence_caps_at_thirty() {
        let doubling = Doubling::default();
        let mut state: Option<ReviewMetadata> = None;
        let mut intervals = Vec::new();
        for _ in 0..8 {
            let result = doubling
                .record_review(1, state.as_ref(), ReviewOutcome::Remembered, now())
                .unwrap();
            intervals.push(result.metadata.interval_days);
            state = Some(result.metadata);
        }
        assert_eq!(intervals, vec![2, 4, 8, 16, 30, 30, 30, 30]);
    }

    #[test]
    fn first_forgot_then_remembered() {
        let doubling = Doubling::default();
        let first = doubling
            .record_review(3, None, ReviewOutcome::Forgot, now())
            .unwrap();
        assert_eq!(
            first.metadata,
            ReviewMetadata {
                total_reviews: 1,
                times_remembered: 0,
                times_forgot: 1,
                last_reviewed: Some(now()),
                next_review_due: Some(now() + Duration::days(1)),
                interval_days: 1,
            }
        );
        assert_eq!(first.status, ReviewStatus::Forgot);

        let later = now() + Duration::days(1);
        let second = doubling
            .record_review(3, Some(&first.metadata), ReviewOutcome::Remembered, later)
            .unwrap();
        assert_eq!(
            second.metadata,
            ReviewMetadata {
                total_reviews: 2,
                times_remembered: 1,
                times_forgot: 1,
                last_reviewed: Some(later),
                next_review_due: Some(later + Duration::days(2)),
                interval_days: 2,
            }
        );
        assert_eq!(second.status, ReviewStatus::Remembered);
    }

    #[test]
    fn fresh_state_matches_never_reviewed() {
        let doubling = Doubling::default();
        let from_none = doubling
            .record_review(5, None, ReviewOutcome::Remembered, now())
            .unwrap();
        let from_default = doubling
            .record_review(5, Some(&doubling.initial_metadata()), ReviewOutcome::Remembered, now())
            .unwrap();
        assert_eq!(from_none, from_default);
        assert_eq!(from_none.metadata.interval_days, 2);
    }

    #[test]
    fn rejects_zero_interval() {
        let doubling = Doubling::default();
        let state = ReviewMetadata {
            interval_days: 0,
            ..Default::default()
        };
        let err = doubling
            .record_review(1, Some(&state), ReviewOutcome::Remembered, now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInterval(0)));
    }

    #[test]
    fn oversized_interval_is_pulled_back_to_cap() {
        let doubling = Doubling::default();
        assert_eq!(doubling.next_interval(u32::MAX, ReviewOutcome::Remembered), 30);
        assert_eq!(doubling.next_interval(45, ReviewOutcome::Remembered), 30);
    }

    #[test]
    fn custom_cap() {
        let doubling = Doubling {
            max_interval_days: 10,
        };
        assert_eq!(doubling.next_interval(4, ReviewOutcome::Remembered), 8);
        assert_eq!(doubling.next_interval(8, ReviewOutcome::Remembered), 10);
    }
}
