//! Route handlers
//!
//! HTTP request handlers for presence, messaging, and liveness.

pub mod health;
pub mod messages;
pub mod presence;
