use std::env;
use std::time::Duration;

use crate::worker::WorkerConfig;

/// Name of the cache bucket owned by the current worker version. Bump
/// the suffix on every deploy that needs cached assets invalidated;
/// activation purges every bucket with a different name.
pub const DEFAULT_CACHE_NAME: &str = "gemini-ai-v1";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub cache_db_path: String,
    pub cache_name: String,
    pub upstream_url: String,
    pub root_url: String,
    pub fetch_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("SHELL_WORKER_STORAGE_PATH").unwrap_or("./".to_string());
        let cache_db_path = format!("{}/db", storage_path);
        let cache_name = env::var("SHELL_WORKER_CACHE_NAME")
            .unwrap_or_else(|_| DEFAULT_CACHE_NAME.to_string());
        // Streamlit's default port, where the app shell is served from
        let upstream_url = env::var("SHELL_WORKER_UPSTREAM_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8501".to_string());
        let root_url = env::var("SHELL_WORKER_ROOT_URL").unwrap_or_else(|_| "/".to_string());
        let fetch_timeout_secs = env::var("SHELL_WORKER_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Self {
            storage_path,
            cache_db_path,
            cache_name,
            upstream_url,
            root_url,
            fetch_timeout_secs,
        }
    }
}

impl AppConfig {
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            cache_name: self.cache_name.clone(),
            root_url: self.root_url.clone(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
