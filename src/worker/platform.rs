//! Services the hosting platform provides to the worker.
//!
//! The worker never reaches for a global; everything it can touch is
//! handed to it as a [`Platform`].
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{FetchRequest, FetchResponse};
use super::notification::{Notification, NotificationDescriptor};

/// Named cache buckets managed by the host.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Names of every bucket that currently exists.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete a bucket and everything in it. Returns false if there was
    /// no such bucket.
    async fn delete(&self, cache_name: &str) -> Result<bool>;

    /// Look up a stored response for the same request identity.
    async fn match_request(
        &self,
        cache_name: &str,
        request: &FetchRequest,
    ) -> Result<Option<FetchResponse>>;
}

/// The network fetch primitive. Only transport failures are errors, an
/// HTTP error status is still a response.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

#[async_trait]
pub trait Notifications: Send + Sync {
    async fn show(&self, descriptor: &NotificationDescriptor) -> Result<Notification>;
    async fn close(&self, notification_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    pub focused: bool,
}

#[async_trait]
pub trait Clients: Send + Sync {
    /// Focus a window already showing `url` or open a new one.
    async fn open_window(&self, url: &str) -> Result<WindowClient>;
}

#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Activate as soon as installation finishes instead of waiting for
    /// clients of the previous version to close.
    async fn skip_waiting(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Platform {
    pub caches: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub notifications: Arc<dyn Notifications>,
    pub clients: Arc<dyn Clients>,
    pub lifecycle: Arc<dyn Lifecycle>,
}
