//! Integration tests for the worker and caches API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use shell_worker::api::{AppState, app};
    use shell_worker::runtime::WorkerHandle;
    use shell_worker::worker::{CacheStorage, FetchRequest, FetchResponse};

    use crate::test_utils::{
        body_to_string, offline_upstream, test_app, test_app_with_host, test_config, test_host,
    };

    /// Tests the worker reports itself activated after registration
    #[tokio::test]
    async fn it_reports_worker_state() {
        let app = test_app(&offline_upstream()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/worker")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["state"], "activated");
        assert_eq!(json["cache_name"], "gemini-ai-v1");
    }

    /// Tests registering through the API purges stale caches
    #[tokio::test]
    async fn it_registers_worker() {
        let upstream = offline_upstream();
        let config = test_config(&upstream);
        let host = test_host(&upstream).await;
        host.caches
            .put(
                "gemini-ai-v0",
                &FetchRequest::get("/"),
                &FetchResponse::ok("old shell"),
            )
            .await
            .unwrap();
        let worker = WorkerHandle::spawn(config.worker_config(), host.services());
        let app = app(Arc::new(RwLock::new(AppState::new(
            worker,
            host.clone(),
            config,
        ))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/worker/register")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"state\":\"activated\""));
        assert!(host.caches.keys().await.unwrap().is_empty());
    }

    /// Tests activating an already active worker is an error
    #[tokio::test]
    async fn it_returns_500_when_activating_twice() {
        let app = test_app(&offline_upstream()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/worker/activate")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Tests seeding and listing cache entries
    #[tokio::test]
    async fn it_seeds_and_lists_cache_entries() {
        let (app, host) = test_app_with_host(&offline_upstream()).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/caches/gemini-ai-v1")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "url": "/app",
                            "content_type": "text/html",
                            "body": "<h1>Gemini AI</h1>"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"success\":true"));

        let cached = host
            .caches
            .match_request("gemini-ai-v1", &FetchRequest::get("/app"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.headers["content-type"], "text/html");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/caches")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        assert_eq!(body, r#"["gemini-ai-v1"]"#);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/caches/gemini-ai-v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json[0]["url"], "/app");
        assert_eq!(json[0]["method"], "GET");
        assert_eq!(json[0]["status"], 200);
    }

    /// Tests seeding with missing url returns 422
    #[tokio::test]
    async fn it_returns_422_for_missing_url() {
        let app = test_app(&offline_upstream()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/caches/gemini-ai-v1")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "body": "hello" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Missing required field should return 422 (validation error)
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
