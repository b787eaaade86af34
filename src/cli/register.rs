use anyhow::Result;

use super::init_tracing;
use crate::core::AppConfig;
use crate::host::Host;
use crate::runtime::WorkerHandle;
use crate::worker::CacheStorage;

pub async fn run(config: &AppConfig) -> Result<()> {
    init_tracing();

    let host = Host::from_config(config).await?;
    let worker = WorkerHandle::spawn(config.worker_config(), host.services());

    println!("Registering worker for cache {}...", config.cache_name);
    let state = worker.register().await?;
    println!("Worker is {}", state);

    let remaining = host.caches.keys().await?;
    if remaining.is_empty() {
        println!("No cache buckets");
    } else {
        println!("Cache buckets: {}", remaining.join(", "));
    }

    Ok(())
}
