/**
 * Backend Error Types
 *
 * This module defines the error taxonomy used by every HTTP handler.
 * Each variant maps to exactly one status code; the conversion into an
 * HTTP response lives in `conversion.rs`.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - Malformed input, duplicate email, bad credentials or tokens
 * - Missing accounts, exhausted quota, rate limiting
 * - Webhook payloads that fail signature verification
 *
 * ## Upstream Errors
 *
 * - Image generation service warming up (transient, 503)
 * - Any other third-party failure (500)
 *
 * ## Server Errors
 *
 * - Storage failures, missing configuration, unexpected internal state
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::{Plan, SharedError};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Generation quota exhausted ({used} used)")]
    QuotaExceeded { used: i64, plan: Plan },

    #[error("Too many requests, please try again later")]
    RateLimited { retry_after_secs: u64 },

    #[error("The AI model is loading, please retry in {retry_after_secs} seconds")]
    UpstreamTransient { retry_after_secs: u64 },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Payment processor error: {0}")]
    Payment(String),

    #[error("Webhook Error: {0}")]
    Webhook(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn payment(message: impl Into<String>) -> Self {
        Self::Payment(message.into())
    }

    pub fn webhook(message: impl Into<String>) -> Self {
        Self::Webhook(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::Webhook(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden(_) | Self::QuotaExceeded { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::UpstreamTransient { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Generation(_)
            | Self::Payment(_)
            | Self::Config(_)
            | Self::Storage(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to show to any client
    pub fn public_message(&self) -> String {
        match self {
            Self::Generation(_) => "Image generation failed".to_string(),
            Self::Payment(_) => "Error while creating the checkout session".to_string(),
            Self::QuotaExceeded { .. } => "Limit reached".to_string(),
            Self::Config(_) | Self::Storage(_) | Self::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Server-side failures whose detail is hidden outside development
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error() && !matches!(self, Self::UpstreamTransient { .. })
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::ValidationError { message, .. } => Self::Validation(message),
        }
    }
}
