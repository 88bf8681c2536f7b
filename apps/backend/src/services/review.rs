//! Review submission and reset, each applied as one transaction, and the due queue.

use chrono::{DateTime, Utc};
use practice_core::{ReviewMetadata, ReviewOutcome, ReviewStatus, SpacedRepetitionAlgorithm};

use crate::db::UserScope;
use crate::error::{ApiError, Result};
use crate::models::{DbReviewHistory, DbReviewMetadata, ProblemListQuery, ProblemResponse};

/// Outcome of a committed review.
#[derive(Debug, Clone)]
pub struct RecordedReview {
    pub history: DbReviewHistory,
    pub metadata: ReviewMetadata,
    pub status: ReviewStatus,
}

/// Apply one review to a problem owned by the scope's user.
///
/// Not idempotent: every call appends a history entry and advances the
/// schedule.
pub async fn record_review(
    scope: UserScope<'_>,
    algorithm: &dyn SpacedRepetitionAlgorithm,
    problem_id: i64,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> Result<RecordedReview> {
    let mut tx = scope.begin().await?;

    // Dropping the transaction on an early return rolls it back.
    tx.lock_problem(problem_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Problem {} not found", problem_id)))?;

    let current = tx
        .get_metadata(problem_id)
        .await?
        .map(|m| m.to_core())
        .transpose()?;

    let result = algorithm.record_review(problem_id, current.as_ref(), outcome, now)?;

    tx.upsert_metadata(&DbReviewMetadata::from_core(problem_id, &result.metadata))
        .await?;
    let history = tx.insert_history(&result.event).await?;
    tx.set_review_status(problem_id, result.status).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %scope.user_id(),
        problem_id,
        outcome = %outcome,
        interval_days = result.metadata.interval_days,
        "Recorded review"
    );

    Ok(RecordedReview {
        history,
        metadata: result.metadata,
        status: result.status,
    })
}

/// Drop all review state of a problem and mark it unreviewed.
///
/// Resetting a problem that was never reviewed is a no-op.
pub async fn reset_review(scope: UserScope<'_>, problem_id: i64) -> Result<()> {
    let mut tx = scope.begin().await?;

    tx.lock_problem(problem_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Problem {} not found", problem_id)))?;

    tx.clear_review_state(problem_id).await?;
    tx.set_review_status(problem_id, ReviewStatus::Unreviewed).await?;
    tx.commit().await?;

    tracing::info!(user_id = %scope.user_id(), problem_id, "Reset review state");
    Ok(())
}

/// Problems due at `now`, never-scheduled ones first, then by due date.
pub async fn due_problems(scope: UserScope<'_>, now: DateTime<Utc>) -> Result<Vec<ProblemResponse>> {
    let problems = scope.list_problems(&ProblemListQuery::default()).await?;
    let ids: Vec<i64> = problems.iter().map(|p| p.id).collect();
    let metadata = scope.get_metadata_for(&ids).await?;

    let mut due = Vec::new();
    for problem in &problems {
        let stored = metadata.get(&problem.id);
        let schedule = stored
            .map(DbReviewMetadata::to_core)
            .transpose()?
            .unwrap_or_default();
        if schedule.is_due(now) {
            due.push((schedule.next_review_due, problem.to_api_problem(stored)?));
        }
    }

    // `None` sorts before any date.
    due.sort_by_key(|(next_due, problem)| (*next_due, problem.id));
    Ok(due.into_iter().map(|(_, problem)| problem).collect())
}
