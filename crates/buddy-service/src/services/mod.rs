//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request and composes the in-memory stores into protocol operations.

pub mod context;
pub mod error;
pub mod long_poll;
pub mod message;
pub mod presence;
pub mod typing;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use long_poll::PollOutcome;
pub use message::MessageService;
pub use presence::PresenceService;
pub use typing::TypingService;
