//! Conversation Store
//!
//! Persistent message history keyed by an unordered pair of users.
//!
//! # Module Structure
//!
//! ```text
//! conversations/
//! ├── mod.rs      - ConversationStore (validation + backend dispatch)
//! ├── memory.rs   - In-process backend
//! └── postgres.rs - PostgreSQL backend
//! ```
//!
//! # Guarantees
//!
//! - Lookups are symmetric: `(a, b)` and `(b, a)` resolve to the same record.
//! - At most one conversation exists per pair, even when the first messages
//!   for a pair race.
//! - History is append-only and returned in insertion order.
//!
//! Storage failures are returned to the caller; nothing here retries.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::error::StorageError;
use crate::shared::messaging::{Conversation, ConversationKey, Message};

pub use memory::MemoryConversationStore;
pub use postgres::PgConversationStore;

/// Conversation storage backend
#[derive(Clone)]
pub enum ConversationStore {
    Postgres(PgConversationStore),
    Memory(MemoryConversationStore),
}

impl ConversationStore {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::Postgres(PgConversationStore::new(pool))
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryConversationStore::new())
    }

    /// Find the conversation for a pair, in either orientation
    pub async fn find_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<Conversation>, StorageError> {
        let Ok(key) = ConversationKey::new(user_a, user_b) else {
            return Ok(None);
        };

        match self {
            Self::Postgres(store) => Ok(store.find(key).await?),
            Self::Memory(store) => Ok(store.find(key).await),
        }
    }

    /// Append a message, creating the conversation on first contact
    ///
    /// Returns the conversation as it stands after the append.
    pub async fn append_message(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        sender: Uuid,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Conversation, StorageError> {
        let key = ConversationKey::new(user_a, user_b)?;
        if !key.contains(sender) {
            return Err(StorageError::rejected(
                "Sender must be a participant of the conversation",
            ));
        }
        let message = Message::new(sender, text, timestamp)?;

        let conversation = match self {
            Self::Postgres(store) => store.append(key, message).await?,
            Self::Memory(store) => store.append(key, message).await,
        };

        tracing::debug!(
            "[Conversations] Appended message to {} ({} total)",
            conversation.id,
            conversation.messages.len()
        );

        Ok(conversation)
    }

    /// Full ordered history for a pair; empty if they never talked
    pub async fn history(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>, StorageError> {
        let Ok(key) = ConversationKey::new(user_a, user_b) else {
            return Ok(Vec::new());
        };

        match self {
            Self::Postgres(store) => Ok(store.history(key).await?),
            Self::Memory(store) => Ok(store.history(key).await),
        }
    }
}
