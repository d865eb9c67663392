/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication and account handlers.
 *
 * Request fields are optional at the serde level so that a missing field
 * produces our own 400 validation error instead of a deserialization
 * rejection.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::accounts::Account;
use crate::shared::{Plan, WatermarkSettings};

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    /// Plain password (hashed before storage)
    pub password: Option<String>,
    /// Display name
    pub name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by register and login
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    /// JWT token for authentication (7-day expiration)
    pub token: String,
    pub user: AccountView,
}

/// Public view of an account (no credential)
///
/// The optional parts are only present on the endpoints that expose them:
/// preferences on login and profile, watermark settings on profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub plan: Plan,
    pub generations_used: i64,
    /// `-1` when unlimited
    pub generations_limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_settings: Option<WatermarkSettings>,
}

impl AccountView {
    /// Identity, plan and usage only
    pub fn summary(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            plan: account.plan,
            generations_used: account.generations_used,
            generations_limit: account.plan.generation_limit(),
            language: None,
            theme: None,
            watermark_settings: None,
        }
    }

    /// Summary plus display preferences
    pub fn with_preferences(account: &Account) -> Self {
        Self {
            language: Some(account.locale.clone()),
            theme: Some(account.theme.clone()),
            ..Self::summary(account)
        }
    }

    /// Everything a profile page shows
    pub fn profile(account: &Account) -> Self {
        Self {
            watermark_settings: Some(account.watermark.clone()),
            ..Self::with_preferences(account)
        }
    }
}
