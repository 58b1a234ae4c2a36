/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies the access token from the
 * Authorization header and provides the user to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies it as an access token
/// 3. Checks the user still exists
/// 4. Attaches user data to request extensions for use in handlers
///
/// Returns 401 if the header is missing or malformed or the user is gone,
/// and 403 if the token fails verification.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("[Auth] Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("[Auth] Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = app_state.tokens.verify_access_token(token).map_err(|e| {
        tracing::warn!("[Auth] Invalid access token: {:?}", e);
        StatusCode::FORBIDDEN
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("[Auth] Access token carries a malformed subject");
        StatusCode::FORBIDDEN
    })?;

    match app_state.directory.find_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::warn!("[Auth] Token for deleted user {}", user_id);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            tracing::error!("[Auth] Directory lookup failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Extract authenticated user from request extensions
pub fn extract_authenticated_user(parts: &Parts) -> Result<AuthenticatedUser, StatusCode> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
            StatusCode::UNAUTHORIZED
        })
}

/// Axum extractor for authenticated user
///
/// This can be used as a parameter in handlers behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_authenticated_user(parts).map(AuthUser)
    }
}
