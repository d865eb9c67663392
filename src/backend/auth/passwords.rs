//! Password hashing
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool instead
//! of stalling the async workers.

use crate::backend::error::{BackendError, BackendResult};

/// bcrypt cost factor (2^10 rounds)
pub const BCRYPT_COST: u32 = 10;

/// Cost-10 hash no password maps to, verified when the account is unknown
const DUMMY_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

pub async fn hash_password(password: &str) -> BackendResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| BackendError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            BackendError::Internal(format!("failed to hash password: {}", e))
        })
}

pub async fn verify_password(password: &str, hash: &str) -> BackendResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::Internal(format!("verification task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            BackendError::Internal(format!("failed to verify password: {}", e))
        })
}

/// Spend one verification's worth of work without an account
///
/// Keeps the unknown-email path of login as slow as the wrong-password path.
pub async fn verify_without_account(password: &str) {
    if let Err(e) = verify_password(password, DUMMY_HASH).await {
        tracing::debug!("Dummy verification failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("password123").await.unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$2b$10$"));
        assert!(verify_password("password123", &hash).await.unwrap());
        assert!(!verify_password("wrongpassword", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_dummy_hash_is_well_formed() {
        assert!(DUMMY_HASH.starts_with("$2a$10$"));
        assert!(!verify_password("password123", DUMMY_HASH).await.unwrap());
    }
}
