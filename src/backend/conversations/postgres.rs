//! PostgreSQL conversation storage
//!
//! The pair is stored canonicalized (`user_low < user_high`) under a unique
//! constraint. Appends upsert the conversation row, which both creates it on
//! first contact and row-locks it for the rest of the transaction, so
//! concurrent first messages converge on a single record.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

use crate::shared::messaging::{Conversation, ConversationKey, Message};

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, key: ConversationKey) -> Result<Option<Conversation>, sqlx::Error> {
        let Some(id) = find_conversation_id(&self.pool, key).await? else {
            return Ok(None);
        };
        let messages = load_messages(&self.pool, id).await?;

        Ok(Some(Conversation { id, key, messages }))
    }

    pub async fn append(
        &self,
        key: ConversationKey,
        message: Message,
    ) -> Result<Conversation, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO conversations (id, user_low, user_high, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_low, user_high) DO UPDATE SET updated_at = EXCLUDED.updated_at
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key.low())
        .bind(key.high())
        .bind(message.timestamp)
        .fetch_one(&mut *tx)
        .await?;
        let id: Uuid = row.get("id");

        sqlx::query(
            r#"
            INSERT INTO conversation_messages (conversation_id, sender_id, message_text, sent_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(message.sender)
        .bind(&message.message_text)
        .bind(message.timestamp)
        .execute(&mut *tx)
        .await?;

        let messages = load_messages(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(Conversation { id, key, messages })
    }

    pub async fn history(&self, key: ConversationKey) -> Result<Vec<Message>, sqlx::Error> {
        match find_conversation_id(&self.pool, key).await? {
            Some(id) => load_messages(&self.pool, id).await,
            None => Ok(Vec::new()),
        }
    }
}

async fn find_conversation_id<'e, E: PgExecutor<'e>>(
    executor: E,
    key: ConversationKey,
) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id FROM conversations WHERE user_low = $1 AND user_high = $2
        "#,
    )
    .bind(key.low())
    .bind(key.high())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.get("id")))
}

async fn load_messages<'e, E: PgExecutor<'e>>(
    executor: E,
    conversation_id: Uuid,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT sender_id, message_text, sent_at
        FROM conversation_messages
        WHERE conversation_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Message {
            sender: row.get("sender_id"),
            message_text: row.get("message_text"),
            timestamp: row.get::<DateTime<Utc>, _>("sent_at"),
        })
        .collect())
}
