//! User registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{RegisterRequest, RegisterResponse, UserStatusResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::services::seed::{seed_in, starter_problems};
use crate::services::tokens::{generate_token, hash_token};
use crate::AppState;

/// POST /api/users/register
/// Creates a new user and returns its token. The token is not retrievable later.
/// The user and its starter catalog are committed together.
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let name = payload.and_then(|Json(p)| p.name);
    let token = generate_token();
    let (user, mut tx) = state
        .db
        .begin_user(name.as_deref(), &hash_token(&token))
        .await?;

    let seeded_problems = if state.config.seed_starter_catalog {
        let problems = starter_problems().map_err(|e| ApiError::Internal(e.to_string()))?;
        seed_in(&mut tx, &problems).await?
    } else {
        0
    };
    tx.commit().await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token,
        seeded_problems,
    }))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserStatusResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserStatusResponse {
        user_id: user.id,
        name: user.name,
        last_seen_at: user.last_seen_at,
    }))
}
