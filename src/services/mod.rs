pub mod auth;
pub mod notification_catalog;
pub mod notification_preference;
pub mod preference_store;
pub mod profile;
pub mod profile_completion;
