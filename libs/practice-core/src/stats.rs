//! Dashboard statistics derived from the review history.
//!
//! Calendar days are UTC days.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::types::{DashboardStats, ReviewEvent, ReviewOutcome};

/// Compute dashboard aggregates for one user's catalog and history.
pub fn compute_stats(total_problems: usize, history: &[ReviewEvent], today: NaiveDate) -> DashboardStats {
    let remembered = history
        .iter()
        .filter(|e| e.outcome == ReviewOutcome::Remembered)
        .count();

    DashboardStats {
        total_problems,
        total_reviews: history.len(),
        success_rate: success_rate(remembered, history.len()),
        streak_days: streak_days(history.iter().map(|e| e.reviewed_at), today),
    }
}

/// Percentage of remembered reviews, `0.0` when there are none.
pub fn success_rate(remembered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    remembered as f64 / total as f64 * 100.0
}

/// Length of the unbroken run of review days ending today.
///
/// Days newer than the day being looked for are skipped, so a clock skewed
/// into the future does not break the run.
pub fn streak_days<I>(reviewed_at: I, today: NaiveDate) -> usize
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut timestamps: Vec<DateTime<Utc>> = reviewed_at.into_iter().collect();
    timestamps.sort_unstable_by(|a, b| b.cmp(a));

    let mut seen = HashSet::new();
    let mut streak = 0usize;

    for ts in timestamps {
        let day = ts.date_naive();
        if !seen.insert(day) {
            continue;
        }
        let expected = today - Duration::days(streak as i64);
        if day == expected {
            streak += 1;
        } else if day < expected {
            break;
        }
    }

    streak
}
