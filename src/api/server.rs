use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::{routes, shell};
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::host::Host;
use crate::runtime::WorkerHandle;

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Everything else is a page request controlled by the worker
        .fallback(shell::controlled_fetch)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let shell_host = Host::from_config(&config).await?;
    let worker = WorkerHandle::spawn(config.worker_config(), shell_host.services());

    // Pages served before activation finishes are simply not
    // controlled, so a failed registration doesn't stop the server.
    match worker.register().await {
        Ok(state) => tracing::info!("Worker for {} is {}", config.cache_name, state),
        Err(err) => tracing::error!("Worker registration failed: {}", err),
    }

    let app_state = AppState::new(worker, shell_host, config.clone());
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!(
        "Server started. Listening on {}, upstream {}",
        listener.local_addr()?,
        config.upstream_url
    );

    axum::serve(listener, app).await?;

    Ok(())
}
