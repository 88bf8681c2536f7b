//! Bulk import endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::seed;
use crate::AppState;

/// POST /api/import/problems
/// Creates all problems in one transaction.
pub async fn problems(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(drafts): Json<Vec<ProblemDraft>>,
) -> Result<(StatusCode, Json<Vec<ProblemResponse>>)> {
    let created = seed::import_problems(state.db.scoped(auth.user_id), drafts).await?;

    let body = created
        .iter()
        .map(|p| p.to_api_problem(None))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/import/starter
/// Adds the bundled starter problems the user does not have yet.
pub async fn starter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SeedResponse>> {
    let inserted = seed::seed_starter_catalog(state.db.scoped(auth.user_id)).await?;
    Ok(Json(SeedResponse { inserted }))
}
