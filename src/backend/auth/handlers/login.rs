/**
 * Login Handler
 *
 * This module implements the authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up the account by normalized email
 * 2. Verify password using bcrypt
 * 3. Stamp the last login time
 * 4. Return token and account info including display preferences
 *
 * Unknown email and wrong password produce the same 401, so the response
 * does not reveal which accounts exist. An unknown email still pays for one
 * bcrypt verification so the two cases take the same time.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::accounts::{get_account_by_email, touch_last_login};
use crate::backend::auth::handlers::types::{AccountView, AuthResponse, LoginRequest};
use crate::backend::auth::passwords::{verify_password, verify_without_account};
use crate::backend::auth::sessions::issue_token;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - email or password missing
/// * `401 Unauthorized` - unknown email or wrong password
/// * `500 Internal Server Error` - storage or token failure
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            tracing::warn!("Login with missing credentials");
            return Err(BackendError::validation("Email and password are required"));
        }
    };

    let Some(account) = get_account_by_email(&state.db, &email).await? else {
        verify_without_account(&password).await;
        tracing::warn!("Login for unknown email: {}", email.trim());
        return Err(BackendError::InvalidCredentials);
    };

    if !verify_password(&password, &account.password_hash).await? {
        tracing::warn!("Invalid password for account: {}", account.id);
        return Err(BackendError::InvalidCredentials);
    }

    let mut account = account;
    account.last_login_at = Some(touch_last_login(&state.db, account.id).await?);

    let token = issue_token(&state.config, account.id, &account.email, account.plan)?;

    tracing::info!("Account logged in: {} ({})", account.email, account.id);

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: AccountView::with_preferences(&account),
    }))
}
