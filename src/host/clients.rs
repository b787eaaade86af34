use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::worker::{Clients, WindowClient};

/// Open app windows. At most one of them is focused.
#[derive(Default)]
pub struct ClientWindows {
    windows: RwLock<Vec<WindowClient>>,
}

impl ClientWindows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn windows(&self) -> Vec<WindowClient> {
        self.windows.read().unwrap().clone()
    }
}

#[async_trait]
impl Clients for ClientWindows {
    async fn open_window(&self, url: &str) -> Result<WindowClient> {
        let mut windows = self.windows.write().unwrap();
        for w in windows.iter_mut() {
            w.focused = false;
        }

        if let Some(existing) = windows.iter_mut().find(|w| w.url == url) {
            existing.focused = true;
            tracing::debug!("Focused window {} at {}", existing.id, url);
            return Ok(existing.clone());
        }

        let window = WindowClient {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            focused: true,
        };
        tracing::debug!("Opened window {} at {}", window.id, url);
        windows.push(window.clone());
        Ok(window)
    }
}
