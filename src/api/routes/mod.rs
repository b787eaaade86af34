//! API routes module

pub mod caches;
mod clients;
pub mod notifications;
mod push;
pub mod worker;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Worker lifecycle routes
        .nest("/worker", worker::router())
        // Cache bucket routes
        .nest("/caches", caches::router())
        // Push delivery
        .nest("/push", push::router())
        // Notification routes
        .nest("/notifications", notifications::router())
        // Open windows
        .nest("/clients", clients::router())
}
