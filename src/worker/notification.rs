use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "🔔 Reminder!";
pub const DEFAULT_BODY: &str = "Time's up!";
pub const ICON_URL: &str = "https://img.icons8.com/fluency/96/chatbot.png";
pub const BADGE_URL: &str = "https://img.icons8.com/fluency/96/chatbot.png";
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];
// Every reminder shares this tag so a new one replaces whatever reminder
// is still on screen instead of stacking.
pub const REMINDER_TAG: &str = "reminder";

/// What a push producer may send. Each field is read on its own: a
/// field that is missing or isn't a string is `None` without affecting
/// the other. A payload that isn't a JSON object has neither.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PushPayload {
    pub fn parse(data: Option<&[u8]>) -> Self {
        let Some(data) = data else {
            return Self::default();
        };
        let value = match serde_json::from_slice::<Value>(data) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!("Ignoring malformed push payload: {}", err);
                return Self::default();
            }
        };
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(String::from);
        Self {
            title: field("title"),
            body: field("body"),
        }
    }
}

/// Display parameters handed to the platform's notification primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDescriptor {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub require_interaction: bool,
}

impl NotificationDescriptor {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            icon: ICON_URL.to_string(),
            badge: BADGE_URL.to_string(),
            vibrate: VIBRATION_PATTERN.to_vec(),
            tag: REMINDER_TAG.to_string(),
            require_interaction: true,
        }
    }

    pub fn from_push_data(data: Option<&[u8]>) -> Self {
        Self::from(PushPayload::parse(data))
    }
}

impl Default for NotificationDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_BODY)
    }
}

impl From<PushPayload> for NotificationDescriptor {
    fn from(payload: PushPayload) -> Self {
        // Empty strings are as good as missing
        let title = payload.title.filter(|s| !s.is_empty());
        let body = payload.body.filter(|s| !s.is_empty());
        Self::new(
            title.as_deref().unwrap_or(DEFAULT_TITLE),
            body.as_deref().unwrap_or(DEFAULT_BODY),
        )
    }
}

/// A notification the platform is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub shown_at: DateTime<Utc>,
    #[serde(flatten)]
    pub descriptor: NotificationDescriptor,
}
