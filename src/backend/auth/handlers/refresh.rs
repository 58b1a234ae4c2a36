//! Token refresh and logout (POST /auth/refresh, POST /auth/logout)
//!
//! Refresh tokens are single-use: a successful refresh stores the new token
//! in place of the old one, and logout clears it.

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{MessageResponse, RefreshRequest};
use crate::backend::auth::sessions::TokenPair;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Exchange a stored refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, BackendError> {
    let token = request.refresh_token.trim();
    if token.is_empty() {
        return Err(BackendError::bad_request("Refresh token required"));
    }

    let user = state
        .directory
        .find_user_by_refresh_token(token)
        .await?
        .ok_or_else(|| BackendError::forbidden("Invalid refresh token"))?;

    let claims = state.tokens.verify_refresh_token(token).map_err(|e| {
        tracing::warn!("[Auth] Refresh token rejected for {}: {:?}", user.id, e);
        BackendError::forbidden("Token verification failed")
    })?;
    if claims.email != user.email || claims.user_id() != Some(user.id) {
        tracing::warn!("[Auth] Refresh token subject mismatch for {}", user.id);
        return Err(BackendError::forbidden("Token verification failed"));
    }

    let tokens = state.tokens.issue_pair(user.id, &user.email).map_err(|e| {
        tracing::error!("[Auth] Failed to create tokens: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;
    state
        .directory
        .set_refresh_token(user.id, Some(tokens.refresh_token.clone()))
        .await?;

    tracing::debug!("[Auth] Rotated tokens for {}", user.id);
    Ok(Json(tokens))
}

/// Invalidate the refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let token = request.refresh_token.trim();
    if token.is_empty() {
        return Err(BackendError::bad_request("Refresh token required"));
    }

    let user = state
        .directory
        .find_user_by_refresh_token(token)
        .await?
        .ok_or_else(|| BackendError::bad_request("Invalid request"))?;

    state.directory.set_refresh_token(user.id, None).await?;
    tracing::info!("[Auth] {} has logged out", user.email);

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
