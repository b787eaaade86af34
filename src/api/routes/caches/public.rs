//! Public types for the caches API
use serde::{Deserialize, Serialize};

/// A response to store in a cache bucket, keyed by `method` and `url`
#[derive(Serialize, Deserialize)]
pub struct SeedEntryRequest {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_status")]
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}
