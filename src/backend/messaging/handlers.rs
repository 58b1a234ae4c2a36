//! Messaging HTTP Handlers
//!
//! Profile lookups, friend requests, user search and conversation history.
//! Every route here sits behind `auth_middleware`; an id in the request that
//! names the acting user must match the authenticated user.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::directory::Directory;
use crate::backend::error::{BackendError, StorageError};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::server::state::AppState;
use crate::shared::error::parse_user_id;
use crate::shared::messaging::{
    AcceptFriendRequestBody, AcceptFriendRequestResponse, FriendActionResponse, FriendRef,
    FriendRequestBody, GetMessagesRequest, GetMessagesResponse, RejectFriendRequestBody,
    SearchQuery, SearchResponse, UserInfoResponse, UsernameResponse,
};

/// The acting id in a request must be the caller
fn require_self(auth: &AuthenticatedUser, acting: Uuid) -> Result<(), BackendError> {
    if auth.user_id != acting {
        tracing::warn!(
            "[Messaging] {} attempted to act as {}",
            auth.user_id,
            acting
        );
        return Err(BackendError::forbidden("Not allowed to act for another user"));
    }
    Ok(())
}

async fn require_user(directory: &Directory, id: Uuid) -> Result<User, BackendError> {
    directory
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

fn acknowledged(message: &str) -> Json<FriendActionResponse> {
    Json(FriendActionResponse {
        success: true,
        message: message.to_string(),
    })
}

/// GET /userinfo/{userId}
pub async fn get_user_info(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserInfoResponse>, BackendError> {
    let user_id = parse_user_id("userId", &user_id)?;
    let user_information = state
        .directory
        .user_info(user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(UserInfoResponse {
        success: true,
        user_information,
    }))
}

/// GET /getUsername/{userId}
pub async fn get_username(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UsernameResponse>, BackendError> {
    let user_id = parse_user_id("userId", &user_id)?;
    let user = require_user(&state.directory, user_id).await?;

    Ok(Json(UsernameResponse {
        success: true,
        username: user.name,
    }))
}

/// POST /sendFriendRequest
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(body): Json<FriendRequestBody>,
) -> Result<Json<FriendActionResponse>, BackendError> {
    let sender_id = parse_user_id("senderId", &body.sender_id)?;
    let receiver_id = parse_user_id("receiverId", &body.receiver_id)?;
    if sender_id == receiver_id {
        return Err(BackendError::bad_request("Cannot send request to yourself"));
    }
    require_self(&auth, sender_id)?;

    let directory = &state.directory;
    require_user(directory, sender_id).await?;
    require_user(directory, receiver_id).await?;

    if directory.are_friends(sender_id, receiver_id).await? {
        return Err(BackendError::bad_request("Already friends"));
    }
    if directory.has_pending_request(sender_id, receiver_id).await? {
        return Err(BackendError::bad_request("Friend request already exists"));
    }

    match directory.create_friend_request(sender_id, receiver_id).await {
        Ok(()) => {}
        Err(StorageError::Conflict(_)) => {
            return Err(BackendError::bad_request("Friend request already exists"))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("[Messaging] Friend request {} -> {}", sender_id, receiver_id);
    Ok(acknowledged("Friend request sent"))
}

/// POST /acceptFriendRequest
///
/// `requestId` is the requester's user id. The response carries the new
/// friend, i.e. the requester.
pub async fn accept_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(body): Json<AcceptFriendRequestBody>,
) -> Result<Json<AcceptFriendRequestResponse>, BackendError> {
    if body.request_id.trim().is_empty() || body.accepter_id.trim().is_empty() {
        return Err(BackendError::bad_request(
            "Both requestId and accepterId are required",
        ));
    }
    let requester_id = parse_user_id("requestId", &body.request_id)?;
    let accepter_id = parse_user_id("accepterId", &body.accepter_id)?;
    require_self(&auth, accepter_id)?;

    let directory = &state.directory;
    let requester = require_user(directory, requester_id).await?;
    require_user(directory, accepter_id).await?;

    if !directory
        .accept_friend_request(requester_id, accepter_id)
        .await?
    {
        return Err(BackendError::bad_request("Friend request not found"));
    }

    Ok(Json(AcceptFriendRequestResponse {
        success: true,
        message: "Friend request accepted".to_string(),
        friend: FriendRef {
            id: requester.id,
            name: requester.name,
        },
    }))
}

/// PUT /rejectFriendRequest
pub async fn reject_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(body): Json<RejectFriendRequestBody>,
) -> Result<Json<FriendActionResponse>, BackendError> {
    let requester_id = parse_user_id("requestId", &body.request_id)?;
    let receiver_id = parse_user_id("receiverId", &body.receiver_id)?;
    require_self(&auth, receiver_id)?;

    require_user(&state.directory, requester_id).await?;
    require_user(&state.directory, receiver_id).await?;

    let removed = state
        .directory
        .remove_friend_request(requester_id, receiver_id)
        .await?;
    tracing::debug!(
        "[Messaging] Reject {} -> {} (pending: {})",
        requester_id,
        receiver_id,
        removed
    );

    Ok(acknowledged("Friend request rejected"))
}

/// POST /cancelFriendRequest
pub async fn cancel_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(body): Json<FriendRequestBody>,
) -> Result<Json<FriendActionResponse>, BackendError> {
    let sender_id = parse_user_id("senderId", &body.sender_id)?;
    let receiver_id = parse_user_id("receiverId", &body.receiver_id)?;
    require_self(&auth, sender_id)?;

    require_user(&state.directory, sender_id).await?;
    require_user(&state.directory, receiver_id).await?;

    let removed = state
        .directory
        .remove_friend_request(sender_id, receiver_id)
        .await?;
    tracing::debug!(
        "[Messaging] Cancel {} -> {} (pending: {})",
        sender_id,
        receiver_id,
        removed
    );

    Ok(acknowledged("Friend request canceled"))
}

/// POST /getMessages
///
/// Full history for the pair, oldest first; empty if they never talked.
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(body): Json<GetMessagesRequest>,
) -> Result<Json<GetMessagesResponse>, BackendError> {
    let sender_id = parse_user_id("senderId", &body.sender_id)?;
    let receiver_id = parse_user_id("receiverId", &body.receiver_id)?;
    if auth.user_id != sender_id && auth.user_id != receiver_id {
        return Err(BackendError::forbidden("Not a participant of this conversation"));
    }

    let messages = state.conversations.history(sender_id, receiver_id).await?;

    Ok(Json(GetMessagesResponse {
        success: true,
        messages,
    }))
}

/// GET /search?searchTerm=
///
/// A term that parses as a user id is looked up directly; anything else is
/// a case-insensitive substring match on name or email.
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, BackendError> {
    let term = query.search_term.as_deref().map(str::trim).unwrap_or("");
    if term.is_empty() {
        return Err(BackendError::bad_request("Search term is required"));
    }

    let users = match Uuid::parse_str(term) {
        Ok(id) => state.directory.find_user_by_id(id).await?.into_iter().collect(),
        Err(_) => state.directory.search_users(term).await?,
    };
    let results: Vec<_> = users.iter().map(User::summary).collect();

    Ok(Json(SearchResponse {
        success: true,
        message: if results.is_empty() {
            "No users found".to_string()
        } else {
            "Search results found".to_string()
        },
        results,
    }))
}
