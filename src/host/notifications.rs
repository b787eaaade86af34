use std::sync::RwLock;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::worker::{Notification, NotificationDescriptor, Notifications};

/// The notifications currently on screen, oldest first.
#[derive(Default)]
pub struct NotificationCenter {
    visible: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible.read().unwrap().clone()
    }

    pub fn find(&self, notification_id: &str) -> Option<Notification> {
        self.visible
            .read()
            .unwrap()
            .iter()
            .find(|n| n.id == notification_id)
            .cloned()
    }
}

#[async_trait]
impl Notifications for NotificationCenter {
    async fn show(&self, descriptor: &NotificationDescriptor) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            shown_at: Utc::now(),
            descriptor: descriptor.clone(),
        };

        let mut visible = self.visible.write().unwrap();
        // A tagged notification takes the place of whatever is showing
        // under the same tag
        let before = visible.len();
        visible.retain(|n| n.descriptor.tag != descriptor.tag);
        if visible.len() < before {
            tracing::debug!("Replaced notification tagged {}", descriptor.tag);
        }
        visible.push(notification.clone());

        tracing::info!("Showing notification {}: {}", notification.id, descriptor.title);
        Ok(notification)
    }

    async fn close(&self, notification_id: &str) -> Result<()> {
        let mut visible = self.visible.write().unwrap();
        let Some(idx) = visible.iter().position(|n| n.id == notification_id) else {
            return Err(anyhow!("No visible notification {}", notification_id));
        };
        visible.remove(idx);
        Ok(())
    }
}
