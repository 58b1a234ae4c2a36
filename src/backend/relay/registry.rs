//! Connection Registry
//!
//! Maps a user id to the single live connection bound to it. Last register
//! wins; nothing here is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Sending half of one connection's outbound queue
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    tx: mpsc::Sender<ServerEvent>,
}

impl ConnectionHandle {
    /// New handle plus the receiver its writer task drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The transport is open while its writer still holds the receiver
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue an event without waiting
    pub fn try_send(&self, event: ServerEvent) -> Result<(), mpsc::error::TrySendError<ServerEvent>> {
        self.tx.try_send(event)
    }

    pub fn same_connection(&self, other: &ConnectionHandle) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone)]
struct Binding {
    handle: ConnectionHandle,
    display_name: String,
}

#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    bindings: Arc<Mutex<HashMap<Uuid, Binding>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Binding>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.bindings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bind `user_id` to `handle`, replacing any previous binding
    pub fn bind(&self, user_id: Uuid, handle: ConnectionHandle, display_name: impl Into<String>) {
        let previous = self.lock().insert(
            user_id,
            Binding {
                handle,
                display_name: display_name.into(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(
                "[Registry] Replaced binding for {} (connection {})",
                user_id,
                previous.handle.id()
            );
        }
    }

    pub fn lookup(&self, user_id: Uuid) -> Option<ConnectionHandle> {
        self.lock().get(&user_id).map(|b| b.handle.clone())
    }

    pub fn display_name(&self, user_id: Uuid) -> Option<String> {
        self.lock().get(&user_id).map(|b| b.display_name.clone())
    }

    pub fn unbind(&self, user_id: Uuid) {
        self.lock().remove(&user_id);
    }

    /// Remove the binding only if it still belongs to `connection_id`
    ///
    /// Returns true if a binding was removed.
    pub fn unbind_connection(&self, user_id: Uuid, connection_id: Uuid) -> bool {
        let mut bindings = self.lock();
        match bindings.get(&user_id) {
            Some(binding) if binding.handle.id() == connection_id => {
                bindings.remove(&user_id);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
