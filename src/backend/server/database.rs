/**
 * Database Connection
 *
 * Opens the SQLite connection pool and applies the embedded migrations.
 * The pool is created once at startup and handed to every component through
 * `AppState`; a failure here is fatal for the process.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Connect to the database and run migrations
///
/// # Errors
///
/// Returns the driver error if the URL is invalid, the database cannot be
/// opened or a migration fails.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    tracing::info!("Database connection pool created successfully");

    run_migrations(&pool).await?;
    Ok(pool)
}

/// In-memory database with the schema applied
///
/// A single connection that never expires, otherwise each new connection
/// would see a fresh empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Cheap liveness probe used by the health endpoint
pub async fn ping(pool: &SqlitePool) -> bool {
    if pool.is_closed() {
        return false;
    }
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
