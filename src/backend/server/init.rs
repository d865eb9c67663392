/**
 * Server Initialization
 *
 * This module turns a ready `AppState` into the served application:
 *
 * 1. Create the router with all routes and middleware
 * 2. Start the periodic rate-limit housekeeping task
 *
 * Opening the database and loading configuration happen before this, in
 * the binary, because a failure there must stop the process.
 */

use axum::Router;
use std::time::Duration;

use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;

/// Interval between sweeps of expired rate-limit windows
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the Axum application
///
/// Must be called from within a Tokio runtime.
pub fn create_app(app_state: AppState) -> Router<()> {
    tracing::info!("Initializing backend server");

    let app = create_router(app_state.clone());

    let limiter = app_state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            limiter.prune_expired();
            tracing::debug!(
                "Pruned rate-limit windows, {} clients tracked",
                limiter.tracked_clients()
            );
        }
    });

    tracing::info!("Router configured with periodic cleanup task");

    app
}
