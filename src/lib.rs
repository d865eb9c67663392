//! Roomcraft - Main Library
//!
//! Roomcraft is the backend of an AI interior-design service: accounts with
//! JWT sessions, a quota-limited proxy to a text-to-image model, hosted
//! image storage and Stripe subscription billing.
//!
//! # Module Structure
//!
//! - **`shared`** - Domain types independent of HTTP
//!   - Plans and their generation quota
//!   - Watermark preferences
//!   - Error types
//!
//! - **`backend`** - Axum HTTP server
//!   - Accounts, authentication and sessions
//!   - Generation pipeline (Hugging Face, ImgBB)
//!   - Billing (Stripe checkout and webhooks)
//!   - Edge middleware and the static frontend
//!
//! # Usage
//!
//! ```rust,no_run
//! use roomcraft::backend::server::{
//!     config::ServerConfig, database::connect_database, init::create_app, state::AppState,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let pool = connect_database(&config.database_url).await?;
//! let app = create_app(AppState::new(pool, config)?);
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
