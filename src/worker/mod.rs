//! The background worker for the app shell: offline fallback for
//! network requests, cache bucket cleanup across versions and
//! reminder notifications delivered over push.
//!
//! Each handler is an `async fn`; the returned future is the event's
//! pending work and whoever dispatches the event has to drive it to
//! completion before the worker's context can be recycled.
pub mod http;
pub mod notification;
pub mod platform;

pub use http::{FetchRequest, FetchResponse, RequestKey};
pub use notification::{Notification, NotificationDescriptor, PushPayload};
pub use platform::{CacheStorage, Clients, Lifecycle, Network, Notifications, Platform, WindowClient};

use anyhow::{Result, anyhow};
use futures::future::join_all;

use crate::core::DEFAULT_CACHE_NAME;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// The only cache bucket that survives activation
    pub cache_name: String,
    /// Where clicking a notification takes the user
    pub root_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            root_url: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushEvent {
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct NotificationClickEvent {
    pub notification: Notification,
    /// Action button that was clicked, if any. Every click behaves the
    /// same.
    pub action: Option<String>,
}

pub struct ShellWorker {
    config: WorkerConfig,
    platform: Platform,
}

impl ShellWorker {
    pub fn new(config: WorkerConfig, platform: Platform) -> Self {
        Self { config, platform }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Take over right away. Nothing is precached, the cache only ever
    /// serves as a fallback.
    pub async fn on_install(&self) -> Result<()> {
        tracing::info!("Installing worker for cache {}", self.config.cache_name);
        self.platform.lifecycle.skip_waiting().await
    }

    /// Delete every cache bucket left behind by other versions and
    /// return the names that were removed.
    ///
    /// All deletions are attempted. If any of them fails the activation
    /// fails with it.
    pub async fn on_activate(&self) -> Result<Vec<String>> {
        let caches = &self.platform.caches;
        let stale: Vec<String> = caches
            .keys()
            .await?
            .into_iter()
            .filter(|name| name != &self.config.cache_name)
            .collect();

        let results = join_all(stale.iter().map(|name| caches.delete(name))).await;

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => {
                    tracing::info!("Deleted stale cache {}", name);
                    deleted.push(name);
                }
                Err(err) => {
                    tracing::error!("Failed to delete stale cache {}: {}", name, err);
                    failed.push(name);
                }
            }
        }

        if !failed.is_empty() {
            return Err(anyhow!(
                "Activation aborted, unable to delete caches: {}",
                failed.join(", ")
            ));
        }

        Ok(deleted)
    }

    /// Network first, falling back to the cache bucket when the network
    /// fails. A cache miss re-raises the network error.
    pub async fn on_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let network_err = match self.platform.network.fetch(&request).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        tracing::debug!(
            "Network failed for {} {}, trying cache: {}",
            request.method,
            request.url,
            network_err
        );

        match self
            .platform
            .caches
            .match_request(&self.config.cache_name, &request)
            .await
        {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(network_err),
            Err(cache_err) => {
                tracing::warn!("Cache lookup failed for {}: {}", request.url, cache_err);
                Err(network_err)
            }
        }
    }

    /// Show exactly one reminder notification for the push.
    pub async fn on_push(&self, event: PushEvent) -> Result<Notification> {
        let descriptor = NotificationDescriptor::from_push_data(event.data.as_deref());
        self.platform.notifications.show(&descriptor).await
    }

    /// Dismiss the notification and bring the app to the front.
    pub async fn on_notification_click(&self, event: NotificationClickEvent) -> Result<WindowClient> {
        if let Some(action) = &event.action {
            tracing::debug!("Notification action {} treated as a plain click", action);
        }
        self.platform
            .notifications
            .close(&event.notification.id)
            .await?;
        self.platform.clients.open_window(&self.config.root_url).await
    }
}
