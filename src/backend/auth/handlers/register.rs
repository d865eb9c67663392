/**
 * Register Handler
 *
 * This module implements the account registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate that email, password and name are present
 * 2. Check the password length
 * 3. Check if the email is already registered
 * 4. Hash password using bcrypt (cost 10)
 * 5. Create the Free account
 * 6. Return 201 with a JWT token and the account summary
 *
 * # Validation
 *
 * - All three fields are required and must not be blank
 * - Password must be at least 8 characters long
 * - Email must be unique after normalization; the unique index is the
 *   final arbiter when two registrations race
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::accounts::{create_account, get_account_by_email, is_unique_violation};
use crate::backend::auth::handlers::types::{AccountView, AuthResponse, RegisterRequest};
use crate::backend::auth::passwords::hash_password;
use crate::backend::auth::sessions::issue_token;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

const DUPLICATE_EMAIL: &str = "This email is already in use";

/// Trimmed value, or `None` when missing or blank
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, short password or duplicate email
/// * `500 Internal Server Error` - hashing, storage or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123",
///   "name": "Jane"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let (email, password, name) = match (
        required(request.email),
        request.password.filter(|p| !p.trim().is_empty()),
        required(request.name),
    ) {
        (Some(email), Some(password), Some(name)) => (email, password, name),
        _ => {
            tracing::warn!("Registration with missing fields");
            return Err(BackendError::validation("All fields are required"));
        }
    };

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        tracing::warn!("Password too short");
        return Err(BackendError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if get_account_by_email(&state.db, &email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let password_hash = hash_password(&password).await?;

    let account = create_account(&state.db, &email, &password_hash, &name)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                tracing::warn!("Concurrent registration for: {}", email);
                BackendError::Conflict(DUPLICATE_EMAIL.to_string())
            } else {
                tracing::error!("Failed to create account: {:?}", e);
                BackendError::Storage(e)
            }
        })?;

    let token = issue_token(&state.config, account.id, &account.email, account.plan)?;

    tracing::info!("Account created: {} ({})", account.email, account.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: AccountView::summary(&account),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::state::test_state;
    use crate::shared::Plan;

    fn request(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let state = test_state().await;

        let (status, Json(response)) = register(
            State(state),
            Json(request(" NewUser@Example.com ", "password123", "New User")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(response.success);
        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "newuser@example.com");
        assert_eq!(response.user.plan, Plan::Free);
        assert_eq!(response.user.generations_used, 0);
        assert_eq!(response.user.generations_limit, 3);
        assert!(response.user.language.is_none());
    }

    #[tokio::test]
    async fn test_register_missing_field() {
        let state = test_state().await;
        let incomplete = RegisterRequest {
            email: Some("a@example.com".to_string()),
            password: Some("password123".to_string()),
            name: Some("   ".to_string()),
        };

        let err = register(State(state), Json(incomplete)).await.unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let state = test_state().await;
        let err = register(State(state), Json(request("user@example.com", "short", "U")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let state = test_state().await;

        register(
            State(state.clone()),
            Json(request("duplicate@example.com", "password123", "One")),
        )
        .await
        .unwrap();

        let err = register(
            State(state),
            Json(request("DUPLICATE@example.com", "password456", "Two")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackendError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
