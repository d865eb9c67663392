/**
 * Account Model and Database Operations
 *
 * This module handles account data and database operations. Emails are
 * normalized (trimmed, lower-cased) before every write and lookup, and the
 * schema enforces uniqueness with a case-insensitive index.
 *
 * Plan and subscription columns are only written by `billing::db`, which
 * keeps them in sync with the subscriptions table.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::{Plan, WatermarkSettings, FREE_GENERATION_LIMIT};

/// Account as stored in the database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub plan: Plan,
    pub generations_used: i64,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub locale: String,
    pub theme: String,
    #[sqlx(flatten)]
    pub watermark: WatermarkSettings,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

pub(crate) const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, plan, generations_used, \
     stripe_customer_id, stripe_subscription_id, locale, theme, \
     watermark_enabled, watermark_kind, watermark_logo_url, watermark_text, watermark_locale, \
     watermark_position, watermark_opacity, created_at, last_login_at";

/// Canonical form of an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// True when the driver reports a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Create a new Free account
///
/// # Errors
/// A duplicate email surfaces as a unique violation (see `is_unique_violation`).
pub async fn create_account(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<Account, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO accounts (id, email, password_hash, name, plan, generations_used, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, $6)
        RETURNING {}
        "#,
        ACCOUNT_COLUMNS
    );

    sqlx::query_as::<_, Account>(&query)
        .bind(Uuid::new_v4())
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(name)
        .bind(Plan::Free.as_str())
        .bind(Utc::now())
        .fetch_one(pool)
        .await
}

/// Get account by email (normalized before lookup)
pub async fn get_account_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let query = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
    sqlx::query_as::<_, Account>(&query)
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

/// Get account by ID
pub async fn get_account_by_id(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<Account>, sqlx::Error> {
    let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
    sqlx::query_as::<_, Account>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Stamp the last successful login
pub async fn touch_last_login(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<DateTime<Utc>, sqlx::Error> {
    let now = Utc::now();
    sqlx::query("UPDATE accounts SET last_login_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(now)
}

/// Partial update of locale and theme
///
/// `None` leaves the column unchanged. Returns false when the account is gone.
pub async fn update_preferences(
    pool: &SqlitePool,
    id: Uuid,
    locale: Option<&str>,
    theme: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET locale = COALESCE($1, locale), theme = COALESCE($2, theme)
        WHERE id = $3
        "#,
    )
    .bind(locale)
    .bind(theme)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace the watermark preferences
pub async fn update_watermark(
    pool: &SqlitePool,
    id: Uuid,
    settings: &WatermarkSettings,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET watermark_enabled = $1, watermark_kind = $2, watermark_logo_url = $3,
            watermark_text = $4, watermark_locale = $5, watermark_position = $6,
            watermark_opacity = $7
        WHERE id = $8
        "#,
    )
    .bind(settings.enabled)
    .bind(settings.kind.as_str())
    .bind(&settings.logo_url)
    .bind(&settings.text)
    .bind(&settings.locale)
    .bind(&settings.position)
    .bind(settings.opacity)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Store the Stripe customer created for this account
pub async fn set_stripe_customer_id(
    pool: &SqlitePool,
    id: Uuid,
    customer_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET stripe_customer_id = $1 WHERE id = $2")
        .bind(customer_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomically take one Free generation slot
///
/// Check and increment happen in a single statement, so concurrent requests
/// cannot both pass the limit. Returns the new usage count, or `None` when the
/// account is not on the Free plan or has no slot left.
pub async fn reserve_generation(pool: &SqlitePool, id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE accounts
        SET generations_used = generations_used + 1
        WHERE id = $1 AND plan = $2 AND generations_used < $3
        RETURNING generations_used
        "#,
    )
    .bind(id)
    .bind(Plan::Free.as_str())
    .bind(FREE_GENERATION_LIMIT)
    .fetch_optional(pool)
    .await
}

/// Give back a slot taken by `reserve_generation`
pub async fn release_generation(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE accounts SET generations_used = generations_used - 1 WHERE id = $1 AND generations_used > 0",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::database::connect_in_memory;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = connect_in_memory().await.unwrap();
        let account = create_account(&pool, "Alice@Example.com", "hash", "Alice")
            .await
            .unwrap();

        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.plan, Plan::Free);
        assert_eq!(account.generations_used, 0);
        assert_eq!(account.locale, "fr");
        assert_eq!(account.theme, "dark");
        assert_eq!(account.watermark, WatermarkSettings::default());

        let by_email = get_account_by_email(&pool, "ALICE@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, account.id);

        let by_id = get_account_by_id(&pool, account.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "alice@example.com");

        assert!(get_account_by_id(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = connect_in_memory().await.unwrap();
        create_account(&pool, "dup@example.com", "hash", "One").await.unwrap();
        let err = create_account(&pool, "DUP@example.com", "hash", "Two")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_reserve_stops_at_limit() {
        let pool = connect_in_memory().await.unwrap();
        let account = create_account(&pool, "quota@example.com", "hash", "Q").await.unwrap();

        assert_eq!(reserve_generation(&pool, account.id).await.unwrap(), Some(1));
        assert_eq!(reserve_generation(&pool, account.id).await.unwrap(), Some(2));
        assert_eq!(reserve_generation(&pool, account.id).await.unwrap(), Some(3));
        assert_eq!(reserve_generation(&pool, account.id).await.unwrap(), None);

        release_generation(&pool, account.id).await.unwrap();
        let reloaded = get_account_by_id(&pool, account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.generations_used, 2);
    }

    #[tokio::test]
    async fn test_release_never_goes_negative() {
        let pool = connect_in_memory().await.unwrap();
        let account = create_account(&pool, "zero@example.com", "hash", "Z").await.unwrap();
        release_generation(&pool, account.id).await.unwrap();
        let reloaded = get_account_by_id(&pool, account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.generations_used, 0);
    }

    #[tokio::test]
    async fn test_partial_preference_update() {
        let pool = connect_in_memory().await.unwrap();
        let account = create_account(&pool, "prefs@example.com", "hash", "P").await.unwrap();

        assert!(update_preferences(&pool, account.id, Some("en"), None).await.unwrap());
        let reloaded = get_account_by_id(&pool, account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.locale, "en");
        assert_eq!(reloaded.theme, "dark");

        assert!(!update_preferences(&pool, Uuid::new_v4(), Some("en"), None).await.unwrap());
    }
}
