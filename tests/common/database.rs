//! Database test fixtures
//!
//! Every fixture is a private in-memory SQLite database with the
//! migrations applied, so tests never share state.

use sqlx::SqlitePool;

use roomcraft::backend::server::database::connect_in_memory;

pub struct TestDatabase {
    pool: SqlitePool,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let pool = connect_in_memory()
            .await
            .expect("Failed to open in-memory database");
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Count rows in a table
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar::<_, i64>(&query)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
