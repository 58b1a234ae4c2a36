/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /auth/register.
 *
 * # Registration Process
 *
 * 1. Check that name, email and password are present
 * 2. Check the email is not taken
 * 3. Hash password using bcrypt
 * 4. Create the user in the directory
 *
 * No tokens are issued here; the client logs in afterwards.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::users::User;
use crate::backend::error::{BackendError, StorageError};
use crate::backend::server::state::AppState;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - "Fields are missing" or "Email is already taken"
/// * `500 Internal Server Error` - Hashing or storage failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), BackendError> {
    let name = request.name.trim();
    let email = request.email.trim();
    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(BackendError::bad_request("Fields are missing"));
    }

    if state.directory.find_user_by_email(email).await?.is_some() {
        tracing::debug!("[Auth] Registration for taken email {}", email);
        return Err(BackendError::bad_request("Email is already taken"));
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost).map_err(|e| {
        tracing::error!("[Auth] Failed to hash password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;

    let user = match state
        .directory
        .create_user(User::new(name.to_string(), email.to_string(), password_hash))
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent registration
        Err(StorageError::Conflict(_)) => {
            return Err(BackendError::bad_request("Email is already taken"))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("[Auth] User registered: {} ({})", user.email, user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered".to_string(),
            user: user.summary(),
        }),
    ))
}
