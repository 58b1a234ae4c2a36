/**
 * Real-time Event Protocol
 *
 * JSON events exchanged over the persistent relay connection. Every frame is
 * a single object tagged by `type`:
 *
 * | Direction       | type              | Fields                             |
 * |-----------------|-------------------|------------------------------------|
 * | client → server | `register`        | `userId`, optional `accessToken`   |
 * | client → server | `chat`            | `from`, `to`, `messageText`        |
 * | server → client | `newMessageAlert` | `from`, `messageText`, `timestamp` |
 *
 * Identifiers travel as strings and are validated by [`ClientEvent::parse`],
 * so a malformed id is reported the same way as a missing field.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{parse_user_id, SharedError};

/// Raw client frame as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawClientEvent {
    #[serde(rename_all = "camelCase")]
    Register {
        user_id: String,
        #[serde(default)]
        access_token: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Chat {
        from: String,
        to: String,
        message_text: String,
    },
}

/// Validated event received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Bind this connection to a user
    Register {
        user_id: Uuid,
        /// Access token proving the caller is `user_id`
        access_token: Option<String>,
    },
    /// Persist a message and relay it to `to` if online
    Chat {
        from: Uuid,
        to: Uuid,
        message_text: String,
    },
}

impl ClientEvent {
    /// Decode and validate one text frame
    ///
    /// Unknown `type` values, missing fields, malformed ids and empty message
    /// text all yield an error; the caller discards the frame.
    pub fn parse(frame: &str) -> Result<Self, SharedError> {
        let raw: RawClientEvent = serde_json::from_str(frame)?;
        match raw {
            RawClientEvent::Register {
                user_id,
                access_token,
            } => Ok(Self::Register {
                user_id: parse_user_id("userId", &user_id)?,
                access_token: access_token.filter(|t| !t.trim().is_empty()),
            }),
            RawClientEvent::Chat {
                from,
                to,
                message_text,
            } => {
                if message_text.trim().is_empty() {
                    return Err(SharedError::validation(
                        "messageText",
                        "Message text cannot be empty",
                    ));
                }
                Ok(Self::Chat {
                    from: parse_user_id("from", &from)?,
                    to: parse_user_id("to", &to)?,
                    message_text,
                })
            }
        }
    }

    /// Event name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Chat { .. } => "chat",
        }
    }
}

/// Event pushed from the server to a connected client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A message addressed to this client was stored
    #[serde(rename_all = "camelCase")]
    NewMessageAlert {
        from: Uuid,
        message_text: String,
        /// Milliseconds since the Unix epoch
        timestamp: i64,
    },
}

impl ServerEvent {
    /// Serialize to the JSON text sent over the socket
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
