/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the single container of shared resources:
 * - SQLite connection pool
 * - Server configuration (secrets, upstream URLs, limits)
 * - Outbound HTTP client shared by the upstream integrations
 * - Fixed-window rate limiter
 *
 * There is no module-level global: everything a handler touches comes in
 * through `State<AppState>` or one of the `FromRef` projections below.
 *
 * # Example
 *
 * ```rust,no_run
 * use roomcraft::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let _pool = &state.db;
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::rate_limit::RateLimiter;
use crate::backend::server::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,

    pub config: Arc<ServerConfig>,

    pub http: reqwest::Client,

    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Build the state from an open pool and a configuration
    pub fn new(db: SqlitePool, config: ServerConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("roomcraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Internal(format!("failed to build HTTP client: {}", e)))?;

        let rate_limiter = RateLimiter::new(config.rate_limit);

        Ok(Self {
            db,
            config: Arc::new(config),
            http,
            rate_limiter,
        })
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rate_limiter.clone()
    }
}

/// State over a fresh in-memory database, for unit tests
#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    use crate::backend::server::database::connect_in_memory;

    let pool = connect_in_memory().await.expect("in-memory database");
    let config = ServerConfig {
        jwt_secret: Some("test-secret".to_string()),
        environment: Some("test".to_string()),
        ..ServerConfig::default()
    };
    AppState::new(pool, config).expect("test state")
}
