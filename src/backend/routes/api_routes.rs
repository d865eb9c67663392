/**
 * API Route Handlers
 *
 * This module defines the `/api` routes:
 *
 * ## Public
 * - `GET /api/health` - Liveness and database status
 * - `GET /api/test` - Environment echo
 * - `POST /api/auth/register` - Account creation
 * - `POST /api/auth/login` - Login
 * - `POST /api/webhook` - Stripe events (signature-checked, no bearer token)
 *
 * ## Protected (bearer token)
 * - `GET /api/user/profile`
 * - `PATCH /api/user/settings`
 * - `PUT /api/user/watermark`
 * - `POST /api/generate`
 * - `GET /api/generations`
 * - `POST /api/create-checkout-session`
 *
 * Every route here goes through the rate limiter.
 */

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::backend::account::{get_profile, update_settings, update_watermark};
use crate::backend::auth::{login, register};
use crate::backend::billing::{create_checkout_session, webhook};
use crate::backend::generation::{generate, list_generations};
use crate::backend::health::{api_test, health};
use crate::backend::middleware::{auth_middleware, rate_limit_middleware};
use crate::backend::server::state::AppState;

/// Routes that require a bearer token
fn protected_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/user/profile", get(get_profile))
        .route("/api/user/settings", patch(update_settings))
        .route("/api/user/watermark", put(update_watermark))
        .route("/api/generate", post(generate))
        .route("/api/generations", get(list_generations))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
}

/// Routes open to anonymous callers
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/test", get(api_test))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/webhook", post(webhook))
}

/// All `/api` routes behind the rate limiter
pub fn api_routes(app_state: &AppState) -> Router<AppState> {
    public_routes()
        .merge(protected_routes(app_state))
        .route_layer(middleware::from_fn_with_state(
            app_state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
}
