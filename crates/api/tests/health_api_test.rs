use assignment_consumer_api::{create_routes, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = create_routes(AppState::default());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "assignment-create-consumer");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_disabled_returns_not_found() {
    let app = create_routes(AppState::default());

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_enabled_renders_prometheus_text() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let app = create_routes(AppState {
        metrics: Some(recorder.handle()),
    });

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = create_routes(AppState::default());

    let response = app.oneshot(get("/api/tasks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
