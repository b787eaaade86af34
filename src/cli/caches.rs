use anyhow::Result;

use crate::core::AppConfig;
use crate::host::SqliteCacheStorage;
use crate::worker::CacheStorage;

pub async fn run(entries: bool, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.cache_db_path)?;
    let caches = SqliteCacheStorage::open(&config.cache_db_path).await?;

    for name in caches.keys().await? {
        let current = if name == config.cache_name { " (current)" } else { "" };
        println!("{}{}", name, current);

        if entries {
            for entry in caches.entries(&name).await? {
                println!(
                    "  {} {} {} {}B {}",
                    entry.method, entry.url, entry.status, entry.size, entry.stored_at
                );
            }
        }
    }

    Ok(())
}
