/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the account identity to handlers.
 *
 * A missing token is a 401; a token that is present but fails verification
 * (bad signature, expired, malformed subject) is a 403.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::{jwt_secret, verify_token};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Account identity extracted from the JWT token
///
/// Only the subject is carried: plan and profile are always read from
/// the account row.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
}

/// Bearer token from the Authorization header, if any
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token
/// 3. Attaches the account identity to the request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing bearer token on {}", request.uri().path());
        BackendError::MissingToken
    })?;

    let secret = jwt_secret(&app_state.config)?;

    let claims = verify_token(secret, token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::InvalidToken
    })?;

    let account_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid account ID in token: {:?}", e);
        BackendError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthenticatedUser { account_id });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user set by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::MissingToken
            })?;

        Ok(AuthUser(user))
    }
}
