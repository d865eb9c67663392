/**
 * Subscription Storage
 *
 * The subscriptions table is the source of truth for billing state. The
 * account's `plan` and `stripe_subscription_id` columns are a cache of it,
 * and both functions here write the two sides in one transaction so they
 * cannot disagree.
 */

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::Plan;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELED: &str = "canceled";
/// An active row replaced by a newer subscription on the same account
pub const STATUS_SUPERSEDED: &str = "superseded";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub account_id: Uuid,
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    pub status: String,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Billing period details carried by subscription events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodInfo {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: Option<bool>,
}

/// Unix seconds to a UTC timestamp
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

pub async fn get_subscription(
    pool: &SqlitePool,
    stripe_subscription_id: &str,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, account_id, stripe_subscription_id, stripe_price_id, status,
               current_period_start, current_period_end, cancel_at_period_end,
               created_at, updated_at
        FROM subscriptions
        WHERE stripe_subscription_id = $1
        "#,
    )
    .bind(stripe_subscription_id)
    .fetch_optional(pool)
    .await
}

/// Record an active subscription and upgrade the account
///
/// Returns false, writing nothing, when the account does not exist. Any other
/// active row of the account is marked superseded, and a reactivated id starts
/// over with no period bounds.
pub async fn activate_subscription(
    pool: &SqlitePool,
    account_id: Uuid,
    stripe_subscription_id: &str,
    stripe_price_id: Option<&str>,
    plan: Plan,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let updated = sqlx::query(
        "UPDATE accounts SET plan = $1, stripe_subscription_id = $2 WHERE id = $3",
    )
    .bind(plan.as_str())
    .bind(stripe_subscription_id)
    .bind(account_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE subscriptions SET status = $1, updated_at = $2
        WHERE account_id = $3 AND stripe_subscription_id != $4 AND status = $5
        "#,
    )
    .bind(STATUS_SUPERSEDED)
    .bind(now)
    .bind(account_id)
    .bind(stripe_subscription_id)
    .bind(STATUS_ACTIVE)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO subscriptions
            (id, account_id, stripe_subscription_id, stripe_price_id, status,
             cancel_at_period_end, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 0, $6, $6)
        ON CONFLICT (stripe_subscription_id) DO UPDATE SET
            account_id = excluded.account_id,
            stripe_price_id = COALESCE(excluded.stripe_price_id, subscriptions.stripe_price_id),
            status = excluded.status,
            current_period_start = NULL,
            current_period_end = NULL,
            cancel_at_period_end = 0,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(stripe_subscription_id)
    .bind(stripe_price_id)
    .bind(STATUS_ACTIVE)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Mark a subscription canceled and revert its account to Free
///
/// Returns true when an account was reverted. An unknown subscription id
/// changes nothing.
pub async fn cancel_subscription(
    pool: &SqlitePool,
    stripe_subscription_id: &str,
    period: &PeriodInfo,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = $1,
            current_period_start = COALESCE($2, current_period_start),
            current_period_end = COALESCE($3, current_period_end),
            cancel_at_period_end = COALESCE($4, cancel_at_period_end),
            updated_at = $5
        WHERE stripe_subscription_id = $6
        "#,
    )
    .bind(STATUS_CANCELED)
    .bind(period.start)
    .bind(period.end)
    .bind(period.cancel_at_period_end)
    .bind(Utc::now())
    .bind(stripe_subscription_id)
    .execute(&mut *tx)
    .await?;

    let reverted = sqlx::query(
        "UPDATE accounts SET plan = $1, stripe_subscription_id = NULL WHERE stripe_subscription_id = $2",
    )
    .bind(Plan::Free.as_str())
    .bind(stripe_subscription_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(reverted.rows_affected() > 0)
}
