//! Router for the notifications API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;

use super::public;
use crate::api::state::AppState;
use crate::worker::Notification;

type SharedState = Arc<RwLock<AppState>>;

async fn list_notifications(State(state): State<SharedState>) -> Json<Vec<Notification>> {
    let notifications = state.read().unwrap().host.notifications.clone();
    Json(notifications.visible())
}

// Click a visible notification
async fn click_notification(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<public::ClickParams>,
) -> Result<Response, crate::api::public::ApiError> {
    let (worker, notifications) = {
        let shared_state = state.read().unwrap();
        (
            shared_state.worker.clone(),
            shared_state.host.notifications.clone(),
        )
    };

    let Some(notification) = notifications.find(&id) else {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("No visible notification {}", id),
        )
            .into_response());
    };

    let window = worker.notification_click(notification, params.action).await?;

    Ok(Json(window).into_response())
}

/// Create the notifications router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(list_notifications))
        .route("/{id}/click", axum::routing::post(click_notification))
}
