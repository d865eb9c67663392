//! Backend Module
//!
//! This module contains all server-side code: an Axum HTTP server over a
//! SQLite pool, with outbound calls to the image model, the image host and
//! Stripe.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, database pool, application state, app creation
//! - **`routes`** - Route configuration and router assembly
//! - **`middleware`** - Auth, rate limiting, security headers, error detail
//! - **`error`** - `BackendError` and its HTTP mapping
//! - **`auth`** - Accounts, password hashing, JWT sessions, register/login
//! - **`account`** - Profile, settings and watermark endpoints
//! - **`generation`** - Quota-limited image generation
//! - **`billing`** - Stripe checkout and webhooks
//! - **`health`** - Liveness endpoints
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Configuration, database and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Request middleware
//! ├── error/          - Error types
//! ├── auth/           - Accounts and sessions
//! ├── account/        - Account endpoints
//! ├── generation/     - Generation pipeline
//! ├── billing/        - Stripe integration
//! └── health.rs       - Health endpoints
//! ```
//!
//! # State Management
//!
//! `AppState` holds the pool, the configuration, one outbound HTTP client
//! and the rate limiter. Handlers receive it through `State`; nothing is
//! global.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`. `BackendError` maps each failure to
//! one status code and a JSON body, and keeps internal detail out of
//! responses outside development.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and account storage
pub mod auth;

/// Account endpoints
pub mod account;

/// Image generation
pub mod generation;

/// Stripe billing
pub mod billing;

/// Health endpoints
pub mod health;

/// Middleware for request processing
pub mod middleware;

pub use error::{BackendError, BackendResult};
pub use server::create_app;
