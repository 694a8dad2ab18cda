//! Value objects - immutable types that represent domain concepts

mod presence_status;
mod screen_name;

pub use presence_status::PresenceStatus;
pub use screen_name::ScreenName;
