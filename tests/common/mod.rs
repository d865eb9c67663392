//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration suites:
//! - In-memory database fixture
//! - wiremock stand-ins for Hugging Face, ImgBB and Stripe
//! - A `TestApp` wiring both into the real router
//! - Account and token helpers

#![allow(dead_code)]

pub mod auth_helpers;
pub mod database;
pub mod mock_server;

use axum_test::TestServer;
use sqlx::SqlitePool;
use tempfile::TempDir;

use roomcraft::backend::server::{config::ServerConfig, init::create_app, state::AppState};

pub use auth_helpers::*;
pub use database::*;
pub use mock_server::*;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_integration";
pub const TEST_PRICE_YEARLY: &str = "price_yearly_test";
pub const TEST_PRICE_MONTHLY: &str = "price_monthly_test";
pub const INDEX_HTML: &str = "<!doctype html><title>Roomcraft</title><div id=\"root\"></div>";

/// The application under test with its collaborators
pub struct TestApp {
    pub server: TestServer,
    pub db: SqlitePool,
    pub upstreams: MockUpstreams,
    pub static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Build the app, letting the caller adjust the configuration last
    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let db = TestDatabase::new().await;
        let upstreams = MockUpstreams::start().await;

        let static_dir = tempfile::tempdir().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");
        std::fs::write(static_dir.path().join("app.js"), "console.log('roomcraft');")
            .expect("Failed to write app.js");

        let mut config = ServerConfig {
            environment: Some("test".to_string()),
            jwt_secret: Some(TEST_JWT_SECRET.to_string()),
            huggingface_api_key: Some("hf_test".to_string()),
            huggingface_api_url: upstreams.huggingface.uri(),
            imgbb_api_key: Some("imgbb_test".to_string()),
            imgbb_api_url: upstreams.imgbb.uri(),
            stripe_secret_key: Some("sk_test_123".to_string()),
            stripe_webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
            stripe_price_yearly: Some(TEST_PRICE_YEARLY.to_string()),
            stripe_api_base: upstreams.stripe.uri(),
            static_dir: static_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        adjust(&mut config);

        let state = AppState::new(db.pool().clone(), config).expect("Failed to build state");
        let server = TestServer::new(create_app(state)).expect("Failed to start test server");

        Self {
            server,
            db: db.pool().clone(),
            upstreams,
            static_dir,
        }
    }
}
