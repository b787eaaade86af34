use anyhow::Result;
use http::{HeaderValue, StatusCode, header};

use crate::core::AppConfig;
use crate::host::SqliteCacheStorage;
use crate::worker::{FetchRequest, FetchResponse};

pub async fn run(
    url: &str,
    file: &str,
    cache: Option<String>,
    status: u16,
    content_type: Option<String>,
    config: &AppConfig,
) -> Result<()> {
    let cache_name = cache.unwrap_or_else(|| config.cache_name.clone());
    let body = std::fs::read(file)?;

    let mut response = FetchResponse::new(StatusCode::from_u16(status)?, body);
    if let Some(content_type) = content_type {
        response
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_str(&content_type)?);
    }

    std::fs::create_dir_all(&config.cache_db_path)?;
    let caches = SqliteCacheStorage::open(&config.cache_db_path).await?;
    caches
        .put(&cache_name, &FetchRequest::get(url), &response)
        .await?;

    println!("Stored {} in {} ({} bytes)", url, cache_name, response.body.len());

    Ok(())
}
