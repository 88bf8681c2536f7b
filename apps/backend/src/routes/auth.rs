//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::services::tokens::hash_token;
use crate::AppState;

/// Authenticated user stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Auth middleware - resolves the bearer token to a user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let user = state
        .db
        .get_user_by_token_hash(&hash_token(token))
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid authentication token".to_string()))?;

    state.db.update_last_seen(user.id).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id: user.id });

    Ok(next.run(request).await)
}
