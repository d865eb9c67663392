/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses so handlers can
 * return `Result<_, BackendError>` and rely on `?` for propagation.
 *
 * # Response Format
 *
 * Error responses are JSON with at least an `error` field:
 * ```json
 * {
 *   "error": "Server error",
 *   "message": "An error occurred"
 * }
 * ```
 *
 * Webhook verification failures are the exception: the payment processor
 * expects a plain-text body, so they are returned as `text/plain`.
 *
 * # Redaction
 *
 * Server errors never put internal detail in the body. The detail travels
 * in an `ErrorDetail` response extension, which the error-detail middleware
 * only surfaces in development.
 */

use axum::{
    http::{header::RETRY_AFTER, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::backend::error::types::BackendError;
use crate::shared::FREE_GENERATION_LIMIT;

/// Generic message sent in place of internal error detail
pub const REDACTED_MESSAGE: &str = "An error occurred";

/// Internal detail of a server error, attached to the response extensions
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let BackendError::Webhook(_) = &self {
            return (status, self.to_string()).into_response();
        }

        let mut body = json!({ "error": self.public_message() });
        let mut retry_after = None;

        match &self {
            BackendError::QuotaExceeded { used, plan } => {
                body["message"] = json!(format!(
                    "You have used your {} free generations",
                    FREE_GENERATION_LIMIT
                ));
                body["upgrade"] = json!(true);
                body["usage"] = json!({
                    "used": used,
                    "limit": plan.generation_limit(),
                    "remaining": plan.remaining(*used),
                });
            }
            BackendError::UpstreamTransient { retry_after_secs } => {
                body["retryAfter"] = json!(retry_after_secs);
                retry_after = Some(*retry_after_secs);
            }
            BackendError::RateLimited { retry_after_secs } => {
                retry_after = Some(*retry_after_secs);
            }
            _ => {}
        }

        let internal = self.is_internal();
        if internal {
            body["message"] = json!(REDACTED_MESSAGE);
        }

        let mut response = (status, Json(body)).into_response();

        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        if internal {
            response.extensions_mut().insert(ErrorDetail {
                error: self.public_message(),
                detail: self.to_string(),
            });
        }

        response
    }
}
