//! # buddy-service
//!
//! Application layer containing the presence, messaging, and typing services,
//! the long-poll dispatcher, and the request/response DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AckResponse, HealthResponse, HeartbeatRequest, PollQuery, PollResponse, SendMessageRequest,
    StatusQuery, StatusResponse, TypingResponse,
};
pub use services::{
    long_poll, MessageService, PollOutcome, PresenceService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TypingService,
};
