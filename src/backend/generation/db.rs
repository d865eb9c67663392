//! Generation history storage
//!
//! Records are append-only: one row per successful generation, never
//! updated afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Number of records returned by the history endpoint
pub const HISTORY_LIMIT: i64 = 20;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub account_id: Uuid,
    pub prompt: String,
    pub style: String,
    pub room_type: Option<String>,
    pub image_url: String,
    pub has_watermark: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields of a generation about to be recorded
#[derive(Debug, Clone)]
pub struct NewGeneration<'a> {
    pub account_id: Uuid,
    pub prompt: &'a str,
    pub style: &'a str,
    pub room_type: Option<&'a str>,
    pub image_url: &'a str,
    pub has_watermark: bool,
}

pub async fn insert_generation(
    pool: &SqlitePool,
    new: &NewGeneration<'_>,
) -> Result<Generation, sqlx::Error> {
    sqlx::query_as::<_, Generation>(
        r#"
        INSERT INTO generations (id, account_id, prompt, style, room_type, image_url, has_watermark, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, account_id, prompt, style, room_type, image_url, has_watermark, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.account_id)
    .bind(new.prompt)
    .bind(new.style)
    .bind(new.room_type)
    .bind(new.image_url)
    .bind(new.has_watermark)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Most recent generations of an account, newest first
///
/// Rows created within the same clock tick keep insertion order (latest first).
pub async fn list_recent_generations(
    pool: &SqlitePool,
    account_id: Uuid,
    limit: i64,
) -> Result<Vec<Generation>, sqlx::Error> {
    sqlx::query_as::<_, Generation>(
        r#"
        SELECT id, account_id, prompt, style, room_type, image_url, has_watermark, created_at
        FROM generations
        WHERE account_id = $1
        ORDER BY created_at DESC, rowid DESC
        LIMIT $2
        "#,
    )
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
