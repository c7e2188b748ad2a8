use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use foremast_service::{
    api::{router, AppState},
    convert::{build_url, parse_group},
    models::{HealthDocument, MetricQuery},
    store::{DocumentStore, MemoryStore, StoreError},
};

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn create(&self, _document: &HealthDocument) -> Result<String, StoreError> {
        Err(StoreError::Unreachable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<HealthDocument>, StoreError> {
        Err(StoreError::Backend {
            status: 503,
            body: "cluster red".to_string(),
        })
    }
}

fn app_with(store: Arc<dyn DocumentStore>) -> Router {
    router(AppState::new(store))
}

fn cpu_params() -> Value {
    json!({
        "endpoint": "http://prometheus:9090/api/v1/",
        "query": "rate(cpu_seconds_total{app=\"svc-a\"}[1m])",
        "start": "1530000000",
        "end": "1530003600",
        "step": "60"
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn post_create(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/healthcheck/create")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get_by_id(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/v1/healthcheck/id/{}", id))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({
        "appName": "svc-a",
        "startTime": "2018-07-01T00:00:00Z",
        "endTime": "2018-07-01T01:00:00Z",
        "strategy": "canary",
        "metrics": {
            "current": {"cpu": {"type": "prometheus", "params": cpu_params()}}
        }
    });

    let (status, created) = send(app_with(store.clone()), post_create(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "new");
    assert_eq!(created["statusCode"], 200);
    let id = created["jobId"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, fetched) = send(app_with(store), get_by_id(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["jobId"], id);
    assert_eq!(fetched["appName"], "svc-a");
    assert_eq!(fetched["status"], "200");
    assert_eq!(fetched["strategy"], "canary");
    assert_eq!(fetched["baselineConfig"], "");

    let params: std::collections::BTreeMap<String, String> =
        serde_json::from_value(cpu_params()).unwrap();
    let expected_url = build_url(&MetricQuery {
        data_source_type: "prometheus".to_string(),
        parameters: params,
    })
    .unwrap();
    let pairs = parse_group(fetched["currentConfig"].as_str().unwrap()).unwrap();
    assert_eq!(pairs, vec![("cpu".to_string(), expected_url)]);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = send(app_with(store.clone()), post_create("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_app_name_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({
        "appName": "  ",
        "metrics": {"current": {"cpu": {"type": "prometheus", "params": cpu_params()}}}
    });
    let (status, body) = send(app_with(store.clone()), post_create(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "appName is empty");
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_current_is_rejected_with_reason() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({"appName": "svc-a", "metrics": {"current": {}}});
    let (status, body) = send(app_with(store.clone()), post_create(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MetricInfo current is empty");
    assert!(store.is_empty());
}

#[tokio::test]
async fn unsupported_current_without_historical_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({
        "appName": "svc-a",
        "metrics": {"current": {"cpu": {"type": "graphite", "params": {"query": "x"}}}}
    });
    let (status, body) = send(app_with(store.clone()), post_create(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let reason = body["error"].as_str().unwrap();
    assert!(reason.starts_with("current query encount error "));
    assert!(reason.contains("graphite"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn historical_rescues_failed_current() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({
        "appName": "svc-a",
        "metrics": {
            "current": {"cpu": {"type": "graphite", "params": {"query": "x"}}},
            "historical": {"cpu": {"dataSourceType": "prometheus", "parameters": cpu_params()}}
        }
    });
    let (status, created) = send(app_with(store.clone()), post_create(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let id = created["jobId"].as_str().unwrap();
    let (_, fetched) = send(app_with(store), get_by_id(id)).await;
    assert_eq!(fetched["currentConfig"], "");
    assert!(fetched["historicalConfig"].as_str().unwrap().starts_with("cpu== "));
}

#[tokio::test]
async fn store_failure_is_reported_in_envelope() {
    let body = json!({
        "appName": "svc-a",
        "metrics": {"current": {"cpu": {"type": "prometheus", "params": cpu_params()}}}
    });
    let (status, created) = send(app_with(Arc::new(FailingStore)), post_create(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["statusCode"], 500);
    assert_eq!(created["jobId"], "");
    assert!(created["reason"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn unknown_id_returns_not_found_envelope() {
    let (status, body) = send(app_with(Arc::new(MemoryStore::new())), get_by_id("nope")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unknown");
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["reason"], "nope not found.");
}

#[tokio::test]
async fn lookup_failure_returns_error_envelope() {
    let (status, body) = send(app_with(Arc::new(FailingStore)), get_by_id("abc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobId"], "abc");
    assert_eq!(body["statusCode"], 500);
    assert!(body["reason"].as_str().unwrap().contains("cluster red"));
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({"appName": "svc-a", "metrics": {"current": {}}});
    send(app_with(store.clone()), post_create(body.to_string())).await;

    let response = app_with(store)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("healthcheck_requests_total"));
    assert!(text.contains("healthcheck_aggregations_total"));
}
