//! Friend Request and User Profile Types
//!
//! Request and response bodies for the relationship endpoints, plus the
//! profile view returned by `/userinfo`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A confirmed friend in a user's friends list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendEntry {
    pub friend_id: Uuid,
    pub friend_name: String,
}

/// One side of a pending friend request (the other user's id and name)
///
/// Serialized as `Id`/`Name`, the field names existing clients read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PendingRequest {
    pub id: Uuid,
    pub name: String,
}

/// Profile plus relationship bookkeeping for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub friends_list: Vec<FriendEntry>,
    pub incoming_friend_requests: Vec<PendingRequest>,
    pub outgoing_friend_requests: Vec<PendingRequest>,
}

impl UserInfo {
    /// Check whether `user_id` is in the friends list
    pub fn is_friend(&self, user_id: Uuid) -> bool {
        self.friends_list.iter().any(|f| f.friend_id == user_id)
    }
}

/// Public user fields returned by search and auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Body for sending or cancelling a request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: String,
}

/// Body for accepting a request; `request_id` is the requester's user id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptFriendRequestBody {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub accepter_id: String,
}

/// Body for rejecting a request; `request_id` is the requester's user id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectFriendRequestBody {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub receiver_id: String,
}

/// Generic `{success, message}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendActionResponse {
    pub success: bool,
    pub message: String,
}

/// The new friend returned after accepting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRef {
    pub id: Uuid,
    pub name: String,
}

/// Response after accepting a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptFriendRequestResponse {
    pub success: bool,
    pub message: String,
    pub friend: FriendRef,
}

/// Response for `/userinfo/{userId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub success: bool,
    pub user_information: UserInfo,
}

/// Response for `/getUsername/{userId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameResponse {
    pub success: bool,
    pub username: String,
}

/// Query string for `/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: Option<String>,
}

/// Response for `/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<UserSummary>,
}
