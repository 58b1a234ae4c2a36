//! Conversation Data Structure
//!
//! A conversation is the full message history between exactly two users.
//! The pair is unordered: `(a, b)` and `(b, a)` name the same conversation,
//! which is enforced by always keying on a canonicalized [`ConversationKey`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use crate::shared::error::SharedError;

/// Canonical key for an unordered pair of distinct users
///
/// The lower id (by `Uuid` ordering) is always stored first, so lookups and
/// uniqueness checks never need an `OR` over both orientations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationKey {
    low: Uuid,
    high: Uuid,
}

impl ConversationKey {
    /// Build the key for two users; fails if both ids are the same user
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, SharedError> {
        if a == b {
            return Err(SharedError::validation(
                "to",
                "A conversation needs two distinct participants",
            ));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Uuid {
        self.low
    }

    pub fn high(&self) -> Uuid {
        self.high
    }

    /// Check if user is one of the two participants
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// Get the other participant
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.low {
            Some(self.high)
        } else if user_id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// Represents the message history between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,
    /// Canonical participant pair
    pub key: ConversationKey,
    /// Messages in insertion order
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation for a pair
    pub fn new(key: ConversationKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            messages: Vec::new(),
        }
    }
}
