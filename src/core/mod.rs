pub mod config;
pub mod db;

pub use config::{AppConfig, DEFAULT_CACHE_NAME};
