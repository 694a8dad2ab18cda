//! Axum extractors for request handling
//!
//! Custom extractors for authentication, body validation, and query parsing.

mod auth;
mod query;
mod validated;

pub use auth::AuthUser;
pub use query::ApiQuery;
pub use validated::{OptionalValidatedJson, ValidatedJson};
