//! # buddy-core
//!
//! Domain layer for the buddy-list presence and messaging core: screen names,
//! the derived presence status, immutable messages, and the clock seam that
//! every time-windowed store reads through.
//! This crate has zero dependencies on infrastructure (web framework, runtime, etc.).

pub mod entities;
pub mod error;
pub mod time;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::Message;
pub use error::DomainError;
pub use time::{Clock, ManualClock, SharedClock, SystemClock};
pub use value_objects::{PresenceStatus, ScreenName};
