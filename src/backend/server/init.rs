/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the optional database (and run migrations)
 * 2. Pick PostgreSQL or in-memory storage
 * 3. Build `AppState` (directory, conversations, relay, token keys)
 * 4. Create and configure the router
 */

use axum::Router;

use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Build application state, falling back to memory without a database
pub async fn build_state(config: ServerConfig) -> AppState {
    match load_database(config.database_url.as_deref()).await {
        Some(pool) => {
            tracing::info!("Using PostgreSQL storage");
            AppState::with_database(config, pool)
        }
        None => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            AppState::in_memory(config)
        }
    }
}

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing palchat backend server");

    let app_state = build_state(config).await;
    let app = create_router(app_state);

    tracing::info!("Router configured");
    app
}
