//! Source catalog
//!
//! Reads column names of a relational source table from MySQL's
//! `information_schema`.

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::time::Duration;

pub async fn create_pool(database_url: &str, timeout: Duration) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(timeout)
        .connect(database_url)
        .await
}

/// Column names of `table` in the connection's current database, in table order
pub async fn table_columns(pool: &MySqlPool, table: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT CAST(column_name AS CHAR)
        FROM information_schema.columns
        WHERE table_schema = DATABASE() AND table_name = ?
        ORDER BY ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
}
