use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::header;

use crate::core::config::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::worker::{FetchRequest, FetchResponse, Network};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS);

/// Fetches page requests from the upstream app server.
#[derive(Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    upstream_url: String,
    timeout: Duration,
}

impl HttpNetwork {
    pub fn new(upstream_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Requests that take longer than `timeout` fail like any other
    /// network error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute urls are fetched as is, paths are resolved against the
    /// upstream.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{}", self.upstream_url, url)
        } else {
            format!("{}/{}", self.upstream_url, url)
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let url = self.resolve(&request.url);

        let mut headers = request.headers.clone();
        // Belongs to the hop between the page and us, not to upstream
        headers.remove(header::HOST);
        headers.remove(header::CONNECTION);

        let resp = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers)
            .body(request.body.clone())
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("Fetch failed for {} {}", request.method, url))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("Fetch failed reading body of {} {}", request.method, url))?
            .to_vec();

        tracing::debug!("{} {} -> {}", request.method, url, status);

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
