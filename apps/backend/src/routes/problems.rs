//! Problem catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::db::UserScope;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// Attach review metadata to each problem
async fn with_metadata(scope: UserScope<'_>, problems: Vec<DbProblem>) -> Result<Vec<ProblemResponse>> {
    let ids: Vec<i64> = problems.iter().map(|p| p.id).collect();
    let metadata = scope.get_metadata_for(&ids).await?;

    problems
        .iter()
        .map(|p| p.to_api_problem(metadata.get(&p.id)).map_err(ApiError::from))
        .collect()
}

fn not_found(problem_id: i64) -> ApiError {
    ApiError::NotFound(format!("Problem {} not found", problem_id))
}

/// GET /api/problems
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ProblemListQuery>,
) -> Result<Json<Vec<ProblemResponse>>> {
    let scope = state.db.scoped(auth.user_id);
    let problems = scope.list_problems(&query).await?;
    Ok(Json(with_metadata(scope, problems).await?))
}

/// GET /api/problems/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(problem_id): Path<i64>,
) -> Result<Json<ProblemResponse>> {
    let scope = state.db.scoped(auth.user_id);
    let problem = scope
        .get_problem(problem_id)
        .await?
        .ok_or_else(|| not_found(problem_id))?;
    let metadata = scope.get_metadata(problem_id).await?;

    Ok(Json(problem.to_api_problem(metadata.as_ref())?))
}

/// POST /api/problems
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(draft): Json<ProblemDraft>,
) -> Result<(StatusCode, Json<ProblemResponse>)> {
    let draft = draft.normalize()?;
    let problem = state.db.scoped(auth.user_id).create_problem(&draft).await?;

    Ok((StatusCode::CREATED, Json(problem.to_api_problem(None)?)))
}

/// PUT /api/problems/:id
/// Fields absent from the body are kept; `null` clears an optional field.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(problem_id): Path<i64>,
    Json(patch): Json<ProblemPatch>,
) -> Result<Json<ProblemResponse>> {
    let scope = state.db.scoped(auth.user_id);
    let current = scope
        .get_problem(problem_id)
        .await?
        .ok_or_else(|| not_found(problem_id))?;

    let draft = patch.apply(current.to_draft()?)?;
    let problem = scope
        .update_problem(problem_id, &draft)
        .await?
        .ok_or_else(|| not_found(problem_id))?;
    let metadata = scope.get_metadata(problem_id).await?;

    Ok(Json(problem.to_api_problem(metadata.as_ref())?))
}

/// DELETE /api/problems/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(problem_id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = state.db.scoped(auth.user_id).delete_problem(problem_id).await?;
    if !deleted {
        return Err(not_found(problem_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/problems/tags
pub async fn tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<String>>> {
    let tags = state.db.scoped(auth.user_id).list_tags().await?;
    Ok(Json(tags))
}
