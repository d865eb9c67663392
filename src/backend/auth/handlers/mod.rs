//! Authentication Handlers Module
//!
//! HTTP handlers for the public authentication endpoints.
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - Account creation (201)
//! - **`login`** - POST /api/auth/login - Credential check
//!
//! Both respond with `{success, token, user}`; the token is a 7-day JWT.

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

pub use types::{AccountView, AuthResponse, LoginRequest, RegisterRequest};

pub use login::login;
pub use register::register;
