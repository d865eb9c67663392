//! Server Module
//!
//! This module contains the server-side foundation: configuration, the
//! database pool, the shared application state and app creation.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Environment configuration
//! ├── database.rs     - SQLite pool and migrations
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - App creation and housekeeping task
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `ServerConfig::from_env` (after `.env` is loaded)
//! 2. **Database**: `connect_database`, fatal on failure
//! 3. **State**: `AppState::new` with the pool and configuration
//! 4. **Router**: `create_app` wires routes, middleware and housekeeping

/// Server configuration loading
pub mod config;

/// Database connection and migrations
pub mod database;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
