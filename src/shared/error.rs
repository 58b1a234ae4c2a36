//! Shared Error Types
//!
//! This module defines error types that are shared between the wire types and
//! the backend. They represent input that cannot be turned into a valid
//! domain value.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures (malformed ids, empty text)
//!
//! # Usage
//!
//! ```rust
//! use palchat::shared::error::SharedError;
//!
//! let error = SharedError::validation("messageText", "Message text cannot be empty");
//! ```

use thiserror::Error;

/// Shared error types raised while building or decoding domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message without the field prefix, suitable for API responses
    pub fn detail(&self) -> &str {
        match self {
            Self::SerializationError { message } => message,
            Self::ValidationError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Parse a user identifier, rejecting anything that is not a UUID
pub fn parse_user_id(field: &str, raw: &str) -> Result<uuid::Uuid, SharedError> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| SharedError::validation(field, "Invalid ID format"))
}
