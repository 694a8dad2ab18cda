//! Session identity
//!
//! Account signup and login live outside this core; what arrives here is an
//! opaque bearer credential naming the authenticated screen name.

mod session_token;

pub use session_token::{SessionClaims, SessionTokens};
