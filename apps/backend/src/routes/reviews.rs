//! Review endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::review;
use crate::AppState;

/// POST /api/reviews
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<ReviewHistoryResponse>> {
    let outcome: ReviewOutcome = payload.result.parse()?;

    let recorded = review::record_review(
        state.db.scoped(auth.user_id),
        state.algorithm.as_ref(),
        payload.problem_id,
        outcome,
        Utc::now(),
    )
    .await?;

    Ok(Json(recorded.history.to_api_history()?))
}

/// GET /api/reviews/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ProblemResponse>>> {
    let due = review::due_problems(state.db.scoped(auth.user_id), Utc::now()).await?;
    Ok(Json(due))
}

/// GET /api/reviews/history
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ReviewHistoryResponse>>> {
    let history = state
        .db
        .scoped(auth.user_id)
        .list_history(query.problem_id)
        .await?;

    history
        .iter()
        .map(|h| h.to_api_history().map_err(ApiError::from))
        .collect::<Result<Vec<_>>>()
        .map(Json)
}

/// GET /api/reviews/stats
/// Streak days are counted in UTC.
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>> {
    let scope = state.db.scoped(auth.user_id);
    let total_problems = scope.count_problems().await?;
    let events = scope
        .list_history(None)
        .await?
        .iter()
        .map(DbReviewHistory::to_core_event)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let stats = practice_core::compute_stats(
        usize::try_from(total_problems).unwrap_or_default(),
        &events,
        Utc::now().date_naive(),
    );
    Ok(Json(stats))
}

/// PUT /api/reviews/:problem_id/reset
pub async fn reset(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(problem_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    review::reset_review(state.db.scoped(auth.user_id), problem_id).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
