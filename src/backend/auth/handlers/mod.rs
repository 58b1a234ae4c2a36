//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - User authentication handler
//! ├── refresh.rs  - Token rotation and logout
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /auth/register
//! - **`login`** - POST /auth/login
//! - **`refresh`** - POST /auth/refresh
//! - **`logout`** - POST /auth/logout
//! - **`get_me`** - GET /auth/me
//!
//! # Authentication Flow
//!
//! 1. **Register**: name, email and password → user created (no tokens)
//! 2. **Login**: credentials verified → access + refresh token returned
//! 3. **Refresh**: stored refresh token → new pair, old token invalidated
//! 4. **Logout**: refresh token cleared

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Refresh and logout handlers
pub mod refresh;

/// Get current user handler
pub mod me;

pub use types::{LoginRequest, LoginResponse, MessageResponse, RefreshRequest, RegisterRequest, RegisterResponse};

pub use login::login;
pub use me::get_me;
pub use refresh::{logout, refresh};
pub use register::register;
