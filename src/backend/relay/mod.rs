//! Real-time Relay
//!
//! Live message delivery between connected clients.
//!
//! # Module Structure
//!
//! ```text
//! relay/
//! ├── mod.rs      - Module exports
//! ├── registry.rs - Connection Registry (user id -> live connection)
//! ├── engine.rs   - Relay Engine and per-connection sessions
//! └── socket.rs   - WebSocket transport at GET /ws
//! ```
//!
//! # Flow
//!
//! 1. Client connects to `/ws` and sends `register {userId}`.
//! 2. The engine checks the user exists and binds the connection.
//! 3. `chat {from, to, messageText}` is persisted first, then pushed to the
//!    recipient as `newMessageAlert` if they are online.
//!
//! Offline recipients see the message on their next history fetch; there is
//! no queueing or retry.

pub mod engine;
pub mod registry;
pub mod socket;

pub use engine::{FrameOutcome, RelayEngine, RelaySession, RelaySettings, SessionState};
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use socket::ws_handler;
