/**
 * Centralized Error Handling
 *
 * Two layers make sure no internal detail leaks outside development:
 *
 * - `expose_error_detail` rewrites redacted server-error bodies with the
 *   `ErrorDetail` extension, but only when running in development.
 * - `panic_response` turns a panicking handler into the same generic 500.
 */

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;

use crate::backend::error::{ErrorDetail, REDACTED_MESSAGE};
use crate::backend::server::config::ServerConfig;

pub async fn expose_error_detail(
    State(config): State<Arc<ServerConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if let Some(detail) = response.extensions_mut().remove::<ErrorDetail>() {
        tracing::error!("{} {}", response.status(), detail.detail);

        if config.is_development() {
            let status = response.status();
            return (
                status,
                Json(json!({ "error": detail.error, "message": detail.detail })),
            )
                .into_response();
        }
    }

    response
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Response for a panicking handler
pub fn panic_response(err: Box<dyn Any + Send + 'static>, development: bool) -> Response {
    let message = panic_message(err.as_ref());
    tracing::error!("Handler panicked: {}", message);

    let detail = if development {
        message
    } else {
        REDACTED_MESSAGE.to_string()
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server error", "message": detail })),
    )
        .into_response()
}
