use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::shared::messaging::{Conversation, ConversationKey, Message};

/// In-process conversation storage
///
/// Used when no database is configured and throughout the test suite. The
/// write lock is the find-or-create critical section, so two first messages
/// for the same pair can never produce two records.
#[derive(Clone, Default)]
pub struct MemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationKey, Conversation>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find(&self, key: ConversationKey) -> Option<Conversation> {
        self.conversations.read().await.get(&key).cloned()
    }

    pub async fn append(&self, key: ConversationKey, message: Message) -> Conversation {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .entry(key)
            .or_insert_with(|| Conversation::new(key));
        conversation.messages.push(message);
        conversation.clone()
    }

    pub async fn history(&self, key: ConversationKey) -> Vec<Message> {
        self.conversations
            .read()
            .await
            .get(&key)
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    /// Number of conversation records
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
