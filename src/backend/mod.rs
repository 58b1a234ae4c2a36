//! Backend Module
//!
//! All server-side code: an Axum HTTP API for accounts and friendships, a
//! WebSocket relay for live messages, and the storage behind both.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly and middleware layers
//! - **`relay`** - Connection Registry, Relay Engine and `/ws` transport
//! - **`conversations`** - Conversation Store (message history per user pair)
//! - **`directory`** - Users, friend requests and friendships
//! - **`auth`** - Registration, login, JWT sessions
//! - **`middleware`** - Bearer token verification
//! - **`messaging`** - Profile, friend request, search and history handlers
//! - **`error`** - Backend error types and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── relay/          - Real-time relay
//! ├── conversations/  - Conversation storage
//! ├── directory/      - User and friend-graph storage
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── messaging/      - HTTP handlers
//! └── error/          - Error types
//! ```
//!
//! # Storage
//!
//! Both stores are enums over a PostgreSQL and an in-memory backend. The
//! in-memory backend is used when `DATABASE_URL` is unset or unreachable,
//! and throughout the tests.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time message relay
pub mod relay;

/// Conversation storage
pub mod conversations;

/// User directory and friend graph
pub mod directory;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Friend system, profiles, search and history
pub mod messaging;

pub use conversations::ConversationStore;
pub use directory::Directory;
pub use error::BackendError;
pub use relay::RelayEngine;
pub use server::create_app;
