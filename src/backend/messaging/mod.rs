//! Messaging Module
//!
//! This module handles friend requests, profile lookups, user search and
//! conversation history over HTTP.

pub mod handlers;

pub use handlers::*;
