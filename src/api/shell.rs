//! Requests from pages of the app shell. Anything that isn't an API
//! route goes through the worker's fetch handler.

use std::sync::{Arc, RwLock};

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};

use crate::api::state::AppState;
use crate::worker::FetchRequest;

type SharedState = Arc<RwLock<AppState>>;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub async fn controlled_fetch(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Response, crate::api::public::ApiError> {
    let worker = state.read().unwrap().worker.clone();

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES).await?;
    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();

    let fetch_request = FetchRequest {
        method: parts.method,
        url,
        headers: parts.headers,
        body: body.to_vec(),
    };

    match worker.fetch(fetch_request).await {
        Ok(fetched) => {
            let mut response = Response::new(Body::from(fetched.body));
            *response.status_mut() = fetched.status;
            *response.headers_mut() = fetched.headers;
            // The body is already complete, let hyper frame it
            response.headers_mut().remove(header::TRANSFER_ENCODING);
            response.headers_mut().remove(header::CONNECTION);
            Ok(response)
        }
        // No network and nothing cached, the page sees a failed request
        Err(err) => {
            tracing::warn!("{}", err);
            Ok((StatusCode::BAD_GATEWAY, format!("{}", err)).into_response())
        }
    }
}
