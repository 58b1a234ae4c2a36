/**
 * Application State Management
 *
 * This module defines the application state structure. The relay engine
 * is exposed through `FromRef` so `/ws` can extract it on its own.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - Server configuration
 * - User directory and conversation storage (PostgreSQL or in-memory)
 * - The relay engine with its connection registry
 * - JWT signing keys
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and shares its interior through `Arc` or a
 * connection pool, so handlers can hold their own copy.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::conversations::ConversationStore;
use crate::backend::directory::Directory;
use crate::backend::relay::{ConnectionRegistry, RelayEngine};
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration
    pub config: Arc<ServerConfig>,

    /// Users and the friend graph
    pub directory: Directory,

    /// Message history per user pair
    pub conversations: ConversationStore,

    /// Live connections and event handling for `/ws`
    pub relay: RelayEngine,

    /// Access and refresh token keys
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    /// Wire up state around the given storage backends
    pub fn new(
        config: ServerConfig,
        directory: Directory,
        conversations: ConversationStore,
    ) -> Self {
        let tokens = Arc::new(TokenKeys::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
        ));
        let relay = RelayEngine::new(
            ConnectionRegistry::new(),
            conversations.clone(),
            directory.clone(),
            tokens.clone(),
            config.relay_settings(),
        );

        Self {
            config: Arc::new(config),
            directory,
            conversations,
            relay,
            tokens,
        }
    }

    /// State backed entirely by in-memory storage
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, Directory::memory(), ConversationStore::memory())
    }

    /// State backed by PostgreSQL
    pub fn with_database(config: ServerConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Directory::postgres(pool.clone()),
            ConversationStore::postgres(pool),
        )
    }
}

/// Lets `/ws` extract `State<RelayEngine>` directly
impl FromRef<AppState> for RelayEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.relay.clone()
    }
}
