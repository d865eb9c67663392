//! Account Module
//!
//! Authenticated endpoints over the caller's own account: profile,
//! display preferences and watermark customization.

pub mod handlers;

pub use handlers::{get_profile, update_settings, update_watermark};
