//! Chat Message Data Structure
//!
//! A single entry in a conversation's history. Messages are immutable once
//! appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Represents a persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// User who sent the message (one of the conversation's participants)
    pub sender: Uuid,
    /// Message text, never empty
    pub message_text: String,
    /// Server-assigned creation time
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message, rejecting empty or whitespace-only text
    pub fn new(
        sender: Uuid,
        message_text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, SharedError> {
        let message_text = message_text.into();
        if message_text.trim().is_empty() {
            return Err(SharedError::validation(
                "messageText",
                "Message text cannot be empty",
            ));
        }

        Ok(Self {
            sender,
            message_text,
            timestamp,
        })
    }

    /// Timestamp in milliseconds since the Unix epoch (wire format for alerts)
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Request body for fetching the history between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: String,
}

/// Response for a history fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessagesResponse {
    pub success: bool,
    pub messages: Vec<Message>,
}
