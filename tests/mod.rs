//! Test suite for palchat
//!
//! This module organizes all integration and property tests

pub mod common;
