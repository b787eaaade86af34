//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::Utc;

use shell_worker::api::{AppState, app};
use shell_worker::core::{AppConfig, DEFAULT_CACHE_NAME};
use shell_worker::host::{HttpNetwork, Host, SqliteCacheStorage};
use shell_worker::runtime::WorkerHandle;
use shell_worker::worker::{
    CacheStorage, Clients, FetchRequest, FetchResponse, Lifecycle, Network, Notification,
    NotificationDescriptor, Notifications, Platform, RequestKey, WindowClient,
};

/// An upstream url nothing is listening on, so every fetch fails like
/// it would when offline.
pub fn offline_upstream() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}", port)
}

pub fn test_config(upstream_url: &str) -> AppConfig {
    AppConfig {
        storage_path: String::from("./"),
        cache_db_path: String::from("./db"),
        cache_name: DEFAULT_CACHE_NAME.to_string(),
        upstream_url: upstream_url.to_string(),
        root_url: String::from("/"),
        fetch_timeout_secs: 5,
    }
}

/// A host whose cache buckets only live in memory.
pub async fn test_host(upstream_url: &str) -> Host {
    let caches = SqliteCacheStorage::in_memory()
        .await
        .expect("Failed to open in-memory cache storage");
    Host::new(caches, HttpNetwork::new(upstream_url))
}

/// Creates a test application router with a registered worker in
/// front of `upstream_url`. The host is returned as well so tests can
/// seed and inspect it directly.
pub async fn test_app_with_host(upstream_url: &str) -> (Router, Host) {
    let config = test_config(upstream_url);
    let host = test_host(upstream_url).await;
    let worker = WorkerHandle::spawn(config.worker_config(), host.services());
    worker.register().await.expect("Failed to register worker");

    let app_state = AppState::new(worker, host.clone(), config);
    (app(Arc::new(RwLock::new(app_state))), host)
}

pub async fn test_app(upstream_url: &str) -> Router {
    test_app_with_host(upstream_url).await.0
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Fakes for driving the worker directly

#[derive(Default)]
pub struct FakeCaches {
    pub names: Mutex<Vec<String>>,
    pub entries: Mutex<HashMap<(String, RequestKey), FetchResponse>>,
    pub failing_deletes: HashSet<String>,
    pub deleted: Mutex<Vec<String>>,
    pub lookups: AtomicUsize,
}

impl FakeCaches {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: Mutex::new(names.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn fail_deleting(mut self, name: &str) -> Self {
        self.failing_deletes.insert(name.to_string());
        self
    }

    pub fn insert(&self, cache_name: &str, request: &FetchRequest, response: FetchResponse) {
        let mut names = self.names.lock().unwrap();
        if !names.iter().any(|n| n == cache_name) {
            names.push(cache_name.to_string());
        }
        self.entries
            .lock()
            .unwrap()
            .insert((cache_name.to_string(), request.key()), response);
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStorage for FakeCaches {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.names())
    }

    async fn delete(&self, cache_name: &str) -> Result<bool> {
        self.deleted.lock().unwrap().push(cache_name.to_string());
        if self.failing_deletes.contains(cache_name) {
            return Err(anyhow!("Storage is locked"));
        }
        let mut names = self.names.lock().unwrap();
        let before = names.len();
        names.retain(|n| n != cache_name);
        self.entries
            .lock()
            .unwrap()
            .retain(|(name, _), _| name != cache_name);
        Ok(names.len() < before)
    }

    async fn match_request(
        &self,
        cache_name: &str,
        request: &FetchRequest,
    ) -> Result<Option<FetchResponse>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(cache_name.to_string(), request.key()))
            .cloned())
    }
}

/// Serves canned responses by url, or fails every request when offline.
#[derive(Default)]
pub struct FakeNetwork {
    pub responses: Mutex<HashMap<String, FetchResponse>>,
    pub offline: AtomicBool,
    pub requests: AtomicUsize,
}

impl FakeNetwork {
    pub fn offline() -> Self {
        let network = Self::default();
        network.offline.store(true, Ordering::SeqCst);
        network
    }

    pub fn serving(url: &str, response: FetchResponse) -> Self {
        let network = Self::default();
        network
            .responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        network
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("net::ERR_INTERNET_DISCONNECTED {}", request.url));
        }
        self.responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| anyhow!("net::ERR_NAME_NOT_RESOLVED {}", request.url))
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub shown: Mutex<Vec<Notification>>,
    pub closed: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifications for RecordingNotifications {
    async fn show(&self, descriptor: &NotificationDescriptor) -> Result<Notification> {
        let mut shown = self.shown.lock().unwrap();
        let notification = Notification {
            id: format!("n{}", shown.len() + 1),
            shown_at: Utc::now(),
            descriptor: descriptor.clone(),
        };
        shown.push(notification.clone());
        Ok(notification)
    }

    async fn close(&self, notification_id: &str) -> Result<()> {
        self.closed
            .lock()
            .unwrap()
            .push(notification_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingClients {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl Clients for RecordingClients {
    async fn open_window(&self, url: &str) -> Result<WindowClient> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(WindowClient {
            id: String::from("window-1"),
            url: url.to_string(),
            focused: true,
        })
    }
}

#[derive(Default)]
pub struct RecordingLifecycle {
    pub skipped_waiting: AtomicBool,
}

#[async_trait]
impl Lifecycle for RecordingLifecycle {
    async fn skip_waiting(&self) -> Result<()> {
        self.skipped_waiting.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Every fake behind the platform handed to a worker, kept around so
/// tests can inspect what the worker did.
pub struct Fakes {
    pub caches: Arc<FakeCaches>,
    pub network: Arc<FakeNetwork>,
    pub notifications: Arc<RecordingNotifications>,
    pub clients: Arc<RecordingClients>,
    pub lifecycle: Arc<RecordingLifecycle>,
}

impl Fakes {
    pub fn new(caches: FakeCaches, network: FakeNetwork) -> Self {
        Self {
            caches: Arc::new(caches),
            network: Arc::new(network),
            notifications: Arc::new(RecordingNotifications::default()),
            clients: Arc::new(RecordingClients::default()),
            lifecycle: Arc::new(RecordingLifecycle::default()),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform {
            caches: self.caches.clone(),
            network: self.network.clone(),
            notifications: self.notifications.clone(),
            clients: self.clients.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}
