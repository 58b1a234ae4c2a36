//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory application fixtures
//! - Authentication test helpers
//! - PostgreSQL fixtures for the ignored database tests

pub mod auth_helpers;

pub use app::*;
pub use auth_helpers::*;
pub use database::*;
