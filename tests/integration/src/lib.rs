//! Integration test utilities for the buddy presence server
//!
//! This crate provides helpers for running end-to-end tests against
//! an in-process HTTP server on an ephemeral port.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
