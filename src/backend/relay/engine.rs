//! Relay Engine
//!
//! Turns inbound client events into conversation writes and live alerts.
//! Each connection gets a [`RelaySession`] that moves through
//! `Unregistered -> Registered -> Closed`. The session is driven by a single
//! task, so one connection's frames are handled strictly in arrival order.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::conversations::ConversationStore;
use crate::backend::directory::Directory;
use crate::backend::relay::registry::{ConnectionHandle, ConnectionRegistry};
use crate::shared::{ClientEvent, ServerEvent};

/// Per-connection limits
#[derive(Debug, Clone, Copy)]
pub struct RelaySettings {
    /// Bounded outbound queue length per connection
    pub outbound_capacity: usize,
    /// Close a connection after this long without a frame; `None` disables
    pub idle_timeout: Option<Duration>,
    /// Server ping period; the pong counts as inbound traffic
    pub ping_interval: Option<Duration>,
    /// Reject `register` frames that carry no access token
    pub require_token: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            outbound_capacity: 64,
            idle_timeout: Some(Duration::from_secs(600)),
            ping_interval: Some(Duration::from_secs(30)),
            require_token: false,
        }
    }
}

/// Shared relay services, cloned into every connection task
#[derive(Clone)]
pub struct RelayEngine {
    registry: ConnectionRegistry,
    conversations: ConversationStore,
    directory: Directory,
    tokens: Arc<TokenKeys>,
    settings: RelaySettings,
}

/// Where a connection is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Registered { user_id: Uuid, display_name: String },
    Closed,
}

/// What happened to one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The connection is now bound to this user
    Registered(Uuid),
    /// Register named a user the directory does not know; state unchanged
    UnknownUser(Uuid),
    /// Message stored and queued for the online recipient
    Delivered,
    /// Message stored; recipient offline, closed or backlogged
    Stored,
    /// Frame dropped without side effects
    Discarded(&'static str),
}

impl RelayEngine {
    pub fn new(
        registry: ConnectionRegistry,
        conversations: ConversationStore,
        directory: Directory,
        tokens: Arc<TokenKeys>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            registry,
            conversations,
            directory,
            tokens,
            settings,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn settings(&self) -> RelaySettings {
        self.settings
    }

    /// Start a session for a freshly accepted connection
    pub fn open_session(&self, handle: ConnectionHandle) -> RelaySession {
        tracing::debug!("[Relay] Connection {} opened", handle.id());
        RelaySession {
            engine: self.clone(),
            handle,
            state: SessionState::Unregistered,
        }
    }

    /// Push an alert to `to` if they have an open connection
    fn deliver(&self, to: Uuid, event: ServerEvent) -> bool {
        let Some(handle) = self.registry.lookup(to) else {
            tracing::debug!("[Relay] {} is offline; message kept for history", to);
            return false;
        };
        if !handle.is_open() {
            tracing::debug!("[Relay] Connection for {} already closed", to);
            return false;
        }

        match handle.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "[Relay] Outbound queue full for {}; alert dropped (message is stored)",
                    to
                );
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// One connection's view of the relay
pub struct RelaySession {
    engine: RelayEngine,
    handle: ConnectionHandle,
    state: SessionState,
}

impl RelaySession {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    /// The bound user, if registered
    pub fn user_id(&self) -> Option<Uuid> {
        match &self.state {
            SessionState::Registered { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// Process one text frame
    ///
    /// Never fails: malformed, unauthorized or unpersistable events are
    /// logged and dropped, and the session stays in its current state.
    pub async fn handle_frame(&mut self, frame: &str) -> FrameOutcome {
        if self.state == SessionState::Closed {
            return FrameOutcome::Discarded("session closed");
        }

        let event = match ClientEvent::parse(frame) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    "[Relay] Discarding malformed event on connection {}: {}",
                    self.handle.id(),
                    e
                );
                return FrameOutcome::Discarded("malformed event");
            }
        };
        tracing::debug!("[Relay] {} event on connection {}", event.kind(), self.handle.id());

        match event {
            ClientEvent::Register {
                user_id,
                access_token,
            } => self.register(user_id, access_token.as_deref()).await,
            ClientEvent::Chat {
                from,
                to,
                message_text,
            } => self.chat(from, to, &message_text).await,
        }
    }

    /// A token, when present or required, must belong to `user_id`
    fn check_token(&self, user_id: Uuid, token: Option<&str>) -> Result<(), &'static str> {
        let Some(token) = token else {
            return if self.engine.settings.require_token {
                Err("token required")
            } else {
                Ok(())
            };
        };
        match self.engine.tokens.verify_access_token(token) {
            Ok(claims) if claims.user_id() == Some(user_id) => Ok(()),
            Ok(_) => Err("token mismatch"),
            Err(_) => Err("invalid token"),
        }
    }

    async fn register(&mut self, user_id: Uuid, token: Option<&str>) -> FrameOutcome {
        if let Err(reason) = self.check_token(user_id, token) {
            tracing::warn!(
                "[Relay] Register as {} on connection {} rejected: {}",
                user_id,
                self.handle.id(),
                reason
            );
            return FrameOutcome::Discarded(reason);
        }

        let user = match self.engine.directory.find_user_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!("[Relay] Register for unknown user {} ignored", user_id);
                return FrameOutcome::UnknownUser(user_id);
            }
            Err(e) => {
                tracing::error!("[Relay] Directory lookup failed for {}: {}", user_id, e);
                return FrameOutcome::Discarded("directory unavailable");
            }
        };

        if let Some(previous) = self.user_id() {
            if previous != user_id {
                self.engine
                    .registry
                    .unbind_connection(previous, self.handle.id());
            }
        }

        self.engine
            .registry
            .bind(user_id, self.handle.clone(), user.name.clone());
        tracing::info!("[Relay] {} ({}) registered", user.name, user_id);

        self.state = SessionState::Registered {
            user_id,
            display_name: user.name,
        };
        FrameOutcome::Registered(user_id)
    }

    async fn chat(&mut self, from: Uuid, to: Uuid, message_text: &str) -> FrameOutcome {
        let Some(bound) = self.user_id() else {
            tracing::warn!(
                "[Relay] Chat on unregistered connection {} discarded",
                self.handle.id()
            );
            return FrameOutcome::Discarded("not registered");
        };
        if from != bound {
            tracing::warn!(
                "[Relay] Connection bound to {} tried to send as {}; discarded",
                bound,
                from
            );
            return FrameOutcome::Discarded("sender mismatch");
        }

        let timestamp = Utc::now();
        if let Err(e) = self
            .engine
            .conversations
            .append_message(from, to, from, message_text, timestamp)
            .await
        {
            tracing::error!("[Relay] Failed to store message {} -> {}: {}", from, to, e);
            return FrameOutcome::Discarded("not persisted");
        }

        let alert = ServerEvent::NewMessageAlert {
            from,
            message_text: message_text.to_string(),
            timestamp: timestamp.timestamp_millis(),
        };
        if self.engine.deliver(to, alert) {
            FrameOutcome::Delivered
        } else {
            FrameOutcome::Stored
        }
    }

    /// Release the binding and end the session; later frames are ignored
    pub fn close(&mut self) {
        if let Some(user_id) = self.user_id() {
            self.engine
                .registry
                .unbind_connection(user_id, self.handle.id());
            tracing::info!("[Relay] {} disconnected", user_id);
        }
        self.state = SessionState::Closed;
    }
}
