//! Router for the cache bucket API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
};
use http::{HeaderValue, Method, StatusCode, header};
use serde_json::Value;

use super::public;
use crate::api::state::AppState;
use crate::host::CacheEntry;
use crate::worker::{CacheStorage, FetchRequest, FetchResponse};

type SharedState = Arc<RwLock<AppState>>;

async fn list_caches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<String>>, crate::api::public::ApiError> {
    let caches = state.read().unwrap().host.caches.clone();
    let names = caches.keys().await?;
    Ok(Json(names))
}

async fn list_entries(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<CacheEntry>>, crate::api::public::ApiError> {
    let caches = state.read().unwrap().host.caches.clone();
    let entries = caches.entries(&name).await?;
    Ok(Json(entries))
}

// Store a response in a bucket. This is how the shell gets populated,
// the worker itself only ever reads from the cache.
async fn seed_entry(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Json(entry): Json<public::SeedEntryRequest>,
) -> Result<Json<Value>, crate::api::public::ApiError> {
    let caches = state.read().unwrap().host.caches.clone();

    let method = Method::from_bytes(entry.method.to_uppercase().as_bytes())?;
    let request = FetchRequest::new(method, &entry.url);

    let mut response = FetchResponse::new(StatusCode::from_u16(entry.status)?, entry.body);
    if let Some(content_type) = entry.content_type {
        response
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_str(&content_type)?);
    }

    caches.put(&name, &request, &response).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Create the caches router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(list_caches))
        .route(
            "/{name}",
            axum::routing::get(list_entries).post(seed_entry),
        )
}
