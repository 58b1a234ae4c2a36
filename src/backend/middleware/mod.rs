//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token verification for protected routes

pub mod auth;

pub use auth::{auth_middleware, extract_authenticated_user, AuthUser, AuthenticatedUser};
