/**
 * API Route Handlers
 *
 * This module registers the HTTP API.
 *
 * # Routes
 *
 * ## Public
 * - `POST /auth/register`, `POST /auth/login`
 * - `POST /auth/refresh`, `POST /auth/logout`
 *
 * ## Protected (Bearer access token)
 * - `GET /auth/me`
 * - `GET /userinfo/{userId}`, `GET /getUsername/{userId}`
 * - `POST /sendFriendRequest`, `POST /acceptFriendRequest`,
 *   `PUT /rejectFriendRequest`, `POST /cancelFriendRequest`
 * - `POST /getMessages`
 * - `GET /search?searchTerm=`
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::{get_me, login, logout, refresh, register};
use crate::backend::messaging::{
    accept_friend_request, cancel_friend_request, get_messages, get_user_info, get_username,
    reject_friend_request, search_users, send_friend_request,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected routes get `auth_middleware` through `route_layer`, so an
/// unknown path still falls through to the 404 fallback instead of 401.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout));

    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .route("/userinfo/{userId}", get(get_user_info))
        .route("/getUsername/{userId}", get(get_username))
        .route("/sendFriendRequest", post(send_friend_request))
        .route("/acceptFriendRequest", post(accept_friend_request))
        .route("/rejectFriendRequest", put(reject_friend_request))
        .route("/cancelFriendRequest", post(cancel_friend_request))
        .route("/getMessages", post(get_messages))
        .route("/search", get(search_users))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router.merge(public).merge(protected)
}
