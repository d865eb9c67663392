/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed with the configured `JWT_SECRET` and expire after
 * seven days.
 *
 * The `plan` claim is a snapshot taken at issuance. Authorization decisions
 * that depend on the plan read the account row instead.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::ServerConfig;
use crate::shared::Plan;

/// Token lifetime in seconds
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Plan at issuance
    pub plan: Plan,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// JWT secret from configuration, reported lazily when absent
pub fn jwt_secret(config: &ServerConfig) -> BackendResult<&str> {
    config.jwt_secret.as_deref().ok_or_else(|| {
        tracing::error!("JWT_SECRET is not configured");
        BackendError::config("JWT_SECRET is not configured")
    })
}

/// Create a JWT token for an account
pub fn create_token(
    secret: &str,
    account_id: Uuid,
    email: &str,
    plan: Plan,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as u64;

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        plan,
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
///
/// Fails on a bad signature, an expired token or malformed claims.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Issue a token for a freshly authenticated account
pub fn issue_token(
    config: &ServerConfig,
    account_id: Uuid,
    email: &str,
    plan: Plan,
) -> BackendResult<String> {
    let secret = jwt_secret(config)?;
    create_token(secret, account_id, email, plan).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::Internal(format!("failed to create token: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_create_and_verify_token() {
        let account_id = Uuid::new_v4();
        let token = create_token(SECRET, account_id, "test@example.com", Plan::Free).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.plan, Plan::Free);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = create_token(SECRET, Uuid::new_v4(), "a@b.c", Plan::PremiumYearly).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@example.com".to_string(),
            plan: Plan::Free,
            exp: now - 3600,
            iat: now - 3600 - TOKEN_TTL_SECS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let config = ServerConfig::default();
        match issue_token(&config, Uuid::new_v4(), "a@b.c", Plan::Free) {
            Err(BackendError::Config(_)) => {}
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
