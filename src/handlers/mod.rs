pub mod auth;
pub mod notification_preference;
pub mod profile;

pub use auth::*;
