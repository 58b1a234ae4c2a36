/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Issue an access/refresh token pair
 * 4. Store the refresh token on the user
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - "Fields are missing", "Email is not registered"
///   or "Password is incorrect"
/// * `500 Internal Server Error` - Storage, hashing or token failure
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, BackendError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(BackendError::bad_request("Fields are missing"));
    }

    let user = state
        .directory
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| {
            tracing::debug!("[Auth] Login for unknown email {}", email);
            BackendError::bad_request("Email is not registered")
        })?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("[Auth] Password verification error: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;
    if !valid {
        tracing::warn!("[Auth] Invalid password for {}", email);
        return Err(BackendError::bad_request("Password is incorrect"));
    }

    let tokens = state.tokens.issue_pair(user.id, &user.email).map_err(|e| {
        tracing::error!("[Auth] Failed to create tokens: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    state
        .directory
        .set_refresh_token(user.id, Some(tokens.refresh_token.clone()))
        .await?;

    tracing::info!("[Auth] {} has logged in", user.email);

    Ok(Json(LoginResponse {
        message: "Logged in".to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: user.summary(),
    }))
}
