//! Router for open app windows

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};

use crate::api::state::AppState;
use crate::worker::WindowClient;

type SharedState = Arc<RwLock<AppState>>;

async fn list_windows(State(state): State<SharedState>) -> Json<Vec<WindowClient>> {
    let clients = state.read().unwrap().host.clients.clone();
    Json(clients.windows())
}

/// Create the clients router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(list_windows))
}
