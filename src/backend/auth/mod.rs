//! Authentication Module
//!
//! This module handles account registration, credential checks and session
//! tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── accounts.rs     - Account model and database operations
//! ├── passwords.rs    - bcrypt hashing off the async workers
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - Account registration handler
//!     └── login.rs    - Authentication handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, password, name → Free account created → JWT returned
//! 2. **Login**: email, password → credentials verified → JWT returned
//! 3. **Protected routes**: bearer JWT verified by `middleware::auth`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt (cost 10) before storage
//! - Tokens expire after 7 days
//! - Unknown email and wrong password return the same 401

/// Account data model and database operations
pub mod accounts;

/// Password hashing
pub mod passwords;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use accounts::Account;
pub use handlers::types::{AccountView, AuthResponse, LoginRequest, RegisterRequest};
pub use handlers::{login, register};
