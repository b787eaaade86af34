//! Router for push delivery

use std::sync::{Arc, RwLock};

use axum::{Json, Router, body::Bytes, extract::State};

use crate::api::state::AppState;
use crate::worker::Notification;

type SharedState = Arc<RwLock<AppState>>;

// Deliver a push message to the worker. The raw request body is the
// payload, an empty body is a push without one.
async fn deliver_push(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Notification>, crate::api::public::ApiError> {
    let worker = state.read().unwrap().worker.clone();
    let data = if body.is_empty() {
        None
    } else {
        Some(body.to_vec())
    };

    let notification = worker.push(data).await?;

    Ok(Json(notification))
}

/// Create the push router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(deliver_push))
}
