//! Shared Error Types
//!
//! This module defines error types for failures that are not tied to a
//! single HTTP handler, such as parsing stored enum values back into their
//! typed form.
//!
//! # Usage
//!
//! ```rust
//! use roomcraft::shared::error::SharedError;
//!
//! let error = SharedError::validation("plan", "unknown plan: GOLD");
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
