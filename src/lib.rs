//! palchat - Main Library
//!
//! A small chat backend: accounts with JWT sessions, a friend-request graph,
//! direct-message history per user pair, and a WebSocket relay that pushes
//! new messages to online recipients.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire and storage types with no server dependencies
//!   - Relay protocol events (`register`, `chat`, `newMessageAlert`)
//!   - `Message`, `Conversation`, `ConversationKey`
//!   - Profile and friend request bodies
//!   - Error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and WebSocket relay
//!   - PostgreSQL (sqlx) or in-memory storage
//!   - Authentication with bcrypt and JWT
//!
//! # Usage
//!
//! ```rust,no_run
//! use palchat::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
