//! Messaging Module
//!
//! This module contains all the data structures for the messaging system:
//!
//! - `Message` - A message in a conversation
//! - `Conversation` / `ConversationKey` - History for an unordered user pair
//! - `UserInfo` and friend request bodies - Relationship bookkeeping
//!
//! # Usage
//!
//! ```rust
//! use palchat::shared::messaging::{Conversation, ConversationKey, Message};
//! ```

pub mod conversation;
pub mod friend_request;
pub mod message;

// Re-export all types
pub use conversation::{Conversation, ConversationKey};
pub use friend_request::{
    AcceptFriendRequestBody, AcceptFriendRequestResponse, FriendActionResponse, FriendEntry,
    FriendRef, FriendRequestBody, PendingRequest, RejectFriendRequestBody, SearchQuery,
    SearchResponse, UserInfo, UserInfoResponse, UserSummary, UsernameResponse,
};
pub use message::{GetMessagesRequest, GetMessagesResponse, Message};
