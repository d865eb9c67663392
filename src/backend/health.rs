//! Liveness endpoints
//!
//! - `GET /api/health` - process and database status
//! - `GET /api/test` - echo of the running environment

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::server::database::ping;
use crate::backend::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// `connected` or `disconnected`
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub env: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if ping(&state.db).await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        database,
    })
}

pub async fn api_test(State(state): State<AppState>) -> Json<TestResponse> {
    Json(TestResponse {
        message: "API is working",
        env: state.config.environment_label().to_string(),
    })
}
