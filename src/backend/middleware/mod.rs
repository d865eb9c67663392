//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//! Middleware functions are used to process requests before they reach
//! handlers, such as authentication, rate limiting and response hardening.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer-token authentication for protected routes
//! - **`rate_limit`** - Fixed-window request limiting per client
//! - **`security`** - Security response headers
//! - **`errors`** - Development-only error detail and panic handling

pub mod auth;
pub mod errors;
pub mod rate_limit;
pub mod security;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use errors::{expose_error_detail, panic_response};
pub use rate_limit::{rate_limit_middleware, RateLimitDecision, RateLimiter};
pub use security::security_headers;
