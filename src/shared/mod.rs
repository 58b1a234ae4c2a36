//! Shared Module
//!
//! This module contains types and data structures that cross the wire: the
//! real-time relay protocol, message and conversation records, and the JSON
//! bodies of the request/response endpoints. Nothing here depends on the
//! server runtime.

/// Real-time relay protocol
pub mod event;

/// Shared error types
pub mod error;

/// Messaging, conversation and relationship types
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use event::{ClientEvent, ServerEvent};
pub use messaging::{Conversation, ConversationKey, Message};
