//! Authentication Module
//!
//! This module handles user registration, login, and session management.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model
//! ├── sessions.rs     - JWT access/refresh tokens
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access tokens expire after 15 minutes, refresh tokens after 1 day
//! - Refresh tokens are stored server-side and rotated on use

/// User data model
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_me, login, logout, refresh, register};
pub use sessions::{Claims, TokenKeys, TokenPair};
pub use users::User;
