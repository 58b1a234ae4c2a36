/**
 * Get Current User Handler
 *
 * This module implements GET /auth/me, returning the authenticated user's
 * public profile. The route sits behind `auth_middleware`.
 */

use axum::{extract::State, response::Json};

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::UserSummary;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - No authenticated user on the request
/// * `404 Not Found` - The user was deleted after the token was issued
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<UserSummary>, BackendError> {
    let user = state
        .directory
        .find_user_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.summary()))
}
