use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use http::StatusCode;
use serde::Serialize;
use tokio_rusqlite::Connection;

use crate::core::db::{async_db, initialize_db};
use crate::worker::http::{headers_to_pairs, pairs_to_headers};
use crate::worker::{CacheStorage, FetchRequest, FetchResponse};

/// Cache buckets persisted in sqlite.
#[derive(Clone)]
pub struct SqliteCacheStorage {
    db: Connection,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub size: usize,
    pub stored_at: String,
}

impl SqliteCacheStorage {
    pub async fn open(db_path: &str) -> Result<Self, Error> {
        let db = async_db(db_path).await?;
        Self::from_connection(db).await
    }

    pub async fn in_memory() -> Result<Self, Error> {
        let db = Connection::open_in_memory().await?;
        Self::from_connection(db).await
    }

    async fn from_connection(db: Connection) -> Result<Self, Error> {
        db.call(|conn| {
            initialize_db(conn)?;
            Ok(())
        })
        .await?;
        Ok(Self { db })
    }

    /// Store `response` under the request's identity, creating the
    /// bucket if this is its first write. The worker never calls this.
    pub async fn put(
        &self,
        cache_name: &str,
        request: &FetchRequest,
        response: &FetchResponse,
    ) -> Result<(), Error> {
        let cache_name = cache_name.to_owned();
        let key = request.key();
        let status = response.status.as_u16();
        let headers = serde_json::to_string(&headers_to_pairs(&response.headers))?;
        let body = response.body.clone();
        let now = Utc::now().to_rfc3339();

        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR IGNORE INTO cache_bucket (name, created_at) VALUES (?, ?)",
                    [&cache_name, &now],
                )?;
                tx.execute(
                    "REPLACE INTO cache_entry (cache_name, method, url, status, headers, body, stored_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![cache_name, key.method, key.url, status, headers, body, now],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    pub async fn entries(&self, cache_name: &str) -> Result<Vec<CacheEntry>, Error> {
        let cache_name = cache_name.to_owned();
        let entries = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT method, url, status, length(body), stored_at
                     FROM cache_entry WHERE cache_name = ? ORDER BY url, method",
                )?;
                let rows = stmt
                    .query_map([cache_name], |i| {
                        Ok(CacheEntry {
                            method: i.get(0)?,
                            url: i.get(1)?,
                            status: i.get(2)?,
                            size: i.get(3)?,
                            stored_at: i.get(4)?,
                        })
                    })?
                    .filter_map(Result::ok)
                    .collect::<Vec<CacheEntry>>();
                Ok(rows)
            })
            .await?;
        Ok(entries)
    }
}

#[async_trait]
impl CacheStorage for SqliteCacheStorage {
    async fn keys(&self) -> Result<Vec<String>> {
        let names = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT name FROM cache_bucket ORDER BY created_at, name")?;
                let rows = stmt
                    .query_map([], |i| i.get(0))?
                    .filter_map(Result::ok)
                    .collect::<Vec<String>>();
                Ok(rows)
            })
            .await?;
        Ok(names)
    }

    async fn delete(&self, cache_name: &str) -> Result<bool> {
        let cache_name = cache_name.to_owned();
        let existed = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM cache_entry WHERE cache_name = ?", [&cache_name])?;
                let deleted = tx.execute("DELETE FROM cache_bucket WHERE name = ?", [&cache_name])?;
                tx.commit()?;
                Ok(deleted > 0)
            })
            .await?;
        Ok(existed)
    }

    async fn match_request(
        &self,
        cache_name: &str,
        request: &FetchRequest,
    ) -> Result<Option<FetchResponse>> {
        let cache_name = cache_name.to_owned();
        let key = request.key();
        let row = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT status, headers, body FROM cache_entry
                     WHERE cache_name = ? AND method = ? AND url = ?",
                )?;
                let mut rows = stmt.query_map([cache_name, key.method, key.url], |i| {
                    Ok((
                        i.get::<_, u16>(0)?,
                        i.get::<_, String>(1)?,
                        i.get::<_, Vec<u8>>(2)?,
                    ))
                })?;
                let row = rows.next().transpose()?;
                Ok(row)
            })
            .await?;

        let Some((status, headers, body)) = row else {
            return Ok(None);
        };
        let pairs: Vec<(String, String)> = serde_json::from_str(&headers)?;

        Ok(Some(FetchResponse {
            status: StatusCode::from_u16(status)?,
            headers: pairs_to_headers(&pairs),
            body,
        }))
    }
}
