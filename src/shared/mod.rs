//! Shared Module
//!
//! Domain types that are independent of the HTTP layer: subscription plans
//! with their quota rules, watermark preferences and shared error types.
//! Backend handlers and storage code both build on these.

/// Shared error types
pub mod error;

/// Plans and generation quota
pub mod plan;

/// Watermark preferences
pub mod watermark;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use plan::{Plan, FREE_GENERATION_LIMIT, UNLIMITED};
pub use watermark::{WatermarkKind, WatermarkSettings, DEFAULT_WATERMARK_TEXT};
