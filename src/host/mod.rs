//! Native implementations of the platform services the worker runs
//! against.
pub mod cache;
pub mod clients;
pub mod network;
pub mod notifications;

pub use cache::{CacheEntry, SqliteCacheStorage};
pub use clients::ClientWindows;
pub use network::HttpNetwork;
pub use notifications::NotificationCenter;

use std::sync::Arc;

use anyhow::{Error, Result};

use crate::core::AppConfig;
use crate::runtime::Services;

#[derive(Clone)]
pub struct Host {
    pub caches: Arc<SqliteCacheStorage>,
    pub network: Arc<HttpNetwork>,
    pub notifications: Arc<NotificationCenter>,
    pub clients: Arc<ClientWindows>,
}

impl Host {
    pub fn new(caches: SqliteCacheStorage, network: HttpNetwork) -> Self {
        Self {
            caches: Arc::new(caches),
            network: Arc::new(network),
            notifications: Arc::new(NotificationCenter::new()),
            clients: Arc::new(ClientWindows::new()),
        }
    }

    /// Host backed by the persistent cache store from `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        std::fs::create_dir_all(&config.cache_db_path)?;
        let caches = SqliteCacheStorage::open(&config.cache_db_path).await?;
        let network = HttpNetwork::new(&config.upstream_url).with_timeout(config.fetch_timeout());
        Ok(Self::new(caches, network))
    }

    pub fn services(&self) -> Services {
        Services {
            caches: self.caches.clone(),
            network: self.network.clone(),
            notifications: self.notifications.clone(),
            clients: self.clients.clone(),
        }
    }
}
