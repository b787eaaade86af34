//! Public types for the notifications API
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ClickParams {
    pub action: Option<String>,
}
