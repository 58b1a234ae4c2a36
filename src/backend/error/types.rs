/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `StorageError` - Failures inside the conversation store or directory
 * - `BackendError` - Everything a handler can return
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors carry their own status code and a message that is safe to
 * show to the client ("User not found", "Already friends", ...).
 *
 * ## Storage Errors
 *
 * Storage errors are logged with their details and reported to the client
 * as a generic server error, except for rejected input and conflicts which
 * map to client errors.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database reported a failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule was violated (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The input violates a record invariant and was not written
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl StorageError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<SharedError> for StorageError {
    fn from(err: SharedError) -> Self {
        Self::Rejected(err.detail().to_string())
    }
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use palchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Already friends");
/// let err = BackendError::not_found("User not found");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid request, business rule violation)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Missing, malformed or expired credentials
    #[error("Authentication error: {message}")]
    AuthError {
        /// Human-readable error message
        message: String,
    },

    /// Persistence failure
    #[error(transparent)]
    StorageError(#[from] StorageError),

    /// Shared error (validation of ids and message text)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 401 Unauthorized
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `AuthError` - 401 Unauthorized
    /// - `StorageError` - 409 for conflicts, 400 for rejected input, 500 otherwise
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::AuthError { .. } => StatusCode::UNAUTHORIZED,
            Self::StorageError(err) => match err {
                StorageError::Conflict(_) => StatusCode::CONFLICT,
                StorageError::Rejected(_) => StatusCode::BAD_REQUEST,
                StorageError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Database details never leave the server.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::AuthError { message } => message.clone(),
            Self::StorageError(StorageError::Database(_)) => "Server error".to_string(),
            Self::StorageError(StorageError::Conflict(message)) => message.clone(),
            Self::StorageError(StorageError::Rejected(message)) => message.clone(),
            Self::SharedError(err) => err.detail().to_string(),
            Self::SerializationError(_) => "Server error".to_string(),
        }
    }
}
