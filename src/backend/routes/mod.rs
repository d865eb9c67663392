//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router creation, edge middleware, static frontend
//! - **`api_routes`** - `/api` endpoints (public and protected)
//!
//! # Route Organization
//!
//! 1. **API Routes** - health, auth, account, generation, billing
//! 2. **Static Files** - assets from `STATIC_DIR`
//! 3. **SPA Fallback** - `index.html` for every other path

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
