//! Counter HTTP — axum transport adapter for the request counter.
//!
//! Every route, including the 404 fallback, runs behind the admission
//! middleware, so each inbound request is counted exactly once.
//! - `GET /`        — the count produced by this request
//! - `GET /health`  — status and a read-only view of the window
//! - `GET /metrics` — Prometheus text format

pub mod error;
pub mod middleware;
pub mod routes;
pub mod types;

use axum::Router;
use axum::routing::get;
use counter_service::ServiceState;
use tower_http::trace::TraceLayer;

/// Builds the HTTP router.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", get(routes::home::home))
        .route("/health", get(routes::system::health))
        .route("/metrics", get(routes::system::metrics_endpoint))
        .fallback(routes::system::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_count::request_count_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves, then drain
/// in-flight requests before returning.
pub async fn serve(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn test_state(dir: &tempfile::TempDir) -> ServiceState {
        ServiceState::load_or_init(Duration::from_secs(60), dir.path().join("count.json"))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn home_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));

        let (status, body) = get_json(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Message"], "status is ok");
        assert_eq!(body["Count"], 1);

        let (_, body) = get_json(app, "/").await;
        assert_eq!(body["Count"], 2);
    }

    #[tokio::test]
    async fn client_supplied_count_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));

        let resp = app
            .oneshot(
                Request::get("/")
                    .header("request-count", "999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["Count"], 1);
    }

    #[tokio::test]
    async fn home_without_middleware_is_internal_error() {
        let app = Router::new().route("/", get(routes::home::home));
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["detail"], "convert count");
    }

    #[tokio::test]
    async fn every_route_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let app = router(state.clone());

        let (status, _) = get_json(app.clone(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["window_seconds"], 60);
        assert_eq!(body["window_count"], 2);
        assert_eq!(state.metrics().requests_total(), 2);
    }

    #[tokio::test]
    async fn metrics_are_prometheus_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));

        let resp = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("counter_requests_total 1\n"));
        assert!(text.contains("counter_window_requests 1\n"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_see_distinct_counts() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { get_json(app, "/").await.1["Count"].as_u64().unwrap() })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let count = handle.await.unwrap();
            assert!(seen.insert(count), "repeated count {count}");
        }
        assert_eq!(seen, (1..=5).collect::<HashSet<u64>>());
    }
}
