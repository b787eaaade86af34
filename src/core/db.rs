use anyhow::{Error, Result};
use tokio_rusqlite::Connection;

const CACHE_DB_FILE: &str = "cache.db";

/// Open the cache bucket store under `db_path`.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    let path = format!("{}/{}", db_path, CACHE_DB_FILE);
    let db = Connection::open(path).await?;
    Ok(db)
}

/// Create the cache bucket tables if they don't already exist.
///
/// A bucket row exists as soon as anything has been written to it and
/// is removed together with its entries when the bucket is deleted.
pub fn initialize_db(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS cache_bucket (
            name TEXT PRIMARY KEY,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cache_entry (
            cache_name TEXT NOT NULL REFERENCES cache_bucket(name) ON DELETE CASCADE,
            method TEXT NOT NULL,
            url TEXT NOT NULL,
            status INTEGER NOT NULL,
            headers TEXT NOT NULL,
            body BLOB NOT NULL,
            stored_at TEXT NOT NULL,
            PRIMARY KEY (cache_name, method, url)
        );
        "#,
    )
}
