/**
 * Router Configuration
 *
 * This module assembles the API routes, the static frontend and the edge
 * middleware into a single Axum router.
 *
 * # Route Order
 *
 * 1. `/api` routes (rate-limited; some behind the auth middleware)
 * 2. Static files from `STATIC_DIR`
 * 3. `index.html` for anything else, so client-side routes survive a reload
 *
 * # Middleware (outermost first)
 *
 * - Request tracing
 * - Security headers
 * - CORS
 * - Panic catcher
 * - Development error detail
 * - 10 MB body limit
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::middleware::{expose_error_detail, panic_response, security_headers};
use crate::backend::routes::api_routes::api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the Axum router with all routes and middleware configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let spa = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let development = config.is_development();

    Router::new()
        .merge(api_routes(&app_state))
        .fallback_service(spa)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            expose_error_detail,
        ))
        .layer(CatchPanicLayer::custom(move |err| {
            panic_response(err, development)
        }))
        .layer(cors_layer(&config))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
