//! Router for the worker lifecycle API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};

use super::public::{ActivateResponse, WorkerStatus};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

async fn worker_status(State(state): State<SharedState>) -> Json<WorkerStatus> {
    let shared_state = state.read().unwrap();
    Json(WorkerStatus {
        state: shared_state.worker.state(),
        cache_name: shared_state.config.cache_name.clone(),
    })
}

// Install the worker and activate it if it skips waiting
async fn register(
    State(state): State<SharedState>,
) -> Result<Json<WorkerStatus>, crate::api::public::ApiError> {
    let (worker, cache_name) = {
        let shared_state = state.read().unwrap();
        (
            shared_state.worker.clone(),
            shared_state.config.cache_name.clone(),
        )
    };

    let state = worker.register().await?;

    Ok(Json(WorkerStatus { state, cache_name }))
}

// Activate a worker that is installed and waiting
async fn activate(
    State(state): State<SharedState>,
) -> Result<Json<ActivateResponse>, crate::api::public::ApiError> {
    let worker = state.read().unwrap().worker.clone();
    let deleted = worker.activate().await?;

    Ok(Json(ActivateResponse {
        state: worker.state(),
        deleted,
    }))
}

/// Create the worker router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(worker_status))
        .route("/register", axum::routing::post(register))
        .route("/activate", axum::routing::post(activate))
}
