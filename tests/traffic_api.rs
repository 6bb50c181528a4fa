use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

use edge_metrics::{
    api::{router, AppState},
    backend::{BackendClient, ClientConnector, ClientKind, TeoConnector},
    config::{AppConfig, ClientProfile, DEFAULT_SITE_ICON, DEFAULT_SITE_NAME},
    credentials::{CredentialResolver, CredentialSource, PartialCredentials},
    models::BackendRequest,
    EdgeMetricsError, Result,
};

struct StaticSource(PartialCredentials);

#[async_trait]
impl CredentialSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> PartialCredentials {
        self.0.clone()
    }
}

fn resolver(id: Option<&str>, key: Option<&str>) -> CredentialResolver {
    CredentialResolver::new(vec![Box::new(StaticSource(PartialCredentials::new(
        id.map(str::to_string),
        key.map(str::to_string),
    )))])
}

type Calls = Arc<Mutex<Vec<(ClientKind, String, Value)>>>;

#[derive(Clone)]
struct MockConnector {
    outcome: std::result::Result<Value, String>,
    calls: Calls,
}

struct MockClient {
    kind: ClientKind,
    connector: MockConnector,
}

#[async_trait]
impl BackendClient for MockClient {
    async fn invoke(&self, action: &str, request: &BackendRequest) -> Result<Value> {
        self.connector.calls.lock().unwrap().push((
            self.kind,
            action.to_string(),
            serde_json::to_value(request).unwrap(),
        ));
        self.connector.outcome.clone().map_err(EdgeMetricsError::backend)
    }
}

impl ClientConnector for MockConnector {
    fn connect(&self, kind: ClientKind, _credentials: &edge_metrics::credentials::Credentials) -> Box<dyn BackendClient> {
        Box::new(MockClient {
            kind,
            connector: self.clone(),
        })
    }
}

fn app(resolver: CredentialResolver, outcome: std::result::Result<Value, String>) -> (Router, Calls) {
    let calls = Calls::default();
    let connector = MockConnector {
        outcome,
        calls: calls.clone(),
    };
    let state = AppState::new(AppConfig::default(), resolver, Arc::new(connector));
    (router(state), calls)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_credentials_short_circuits() {
    let (app, calls) = app(resolver(Some("id"), None), Ok(json!({})));

    let (status, body) = get(app, "/traffic?metric=ccAcl_interceptNum").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing credentials" }));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_credential_source_yields_anything() {
    let (app, calls) = app(resolver(None, None), Ok(json!({})));

    let (status, body) = get(app, "/traffic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing credentials" }));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_query_key_is_an_error_envelope() {
    let (app, calls) = app(resolver(Some("id"), Some("key")), Ok(json!({})));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/traffic?metric=a&metric=b")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["content-type"], "application/json");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("duplicate field"), "{}", message);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_mapped_once() {
    let (app, calls) = app(resolver(Some("id"), Some("key")), Err("timeout".to_string()));

    let (status, body) = get(app, "/traffic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "timeout" }));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_defaults_without_query() {
    let payload = json!({ "Data": [{ "TypeValue": [] }], "RequestId": "abc" });
    let (app, calls) = app(resolver(Some("id"), Some("key")), Ok(payload.clone()));

    let (status, body) = get(app, "/traffic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (kind, action, params) = &calls[0];
    assert_eq!(*kind, ClientKind::Typed);
    assert_eq!(action, "DescribeTimingL7AnalysisData");
    assert_eq!(params["MetricNames"], json!(["l7Flow_flux"]));
    assert!(params.get("Interval").is_none());

    let parse = |v: &Value| DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap();
    let start = parse(&params["StartTime"]);
    let end = parse(&params["EndTime"]);
    let window = (end - start).num_seconds();
    assert!((window - 24 * 3600).abs() <= 1, "window was {}s", window);
    assert!((Utc::now().timestamp() - end.timestamp()).abs() <= 5);
    assert!(params["EndTime"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_security_metric_uses_generic_client() {
    let (app, calls) = app(resolver(Some("id"), Some("key")), Ok(json!({})));

    let (status, _) = get(
        app,
        "/traffic?metric=ccAcl_interceptNum&startTime=2024-01-01T00:00:00Z&endTime=2024-01-02T00:00:00Z&interval=auto",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = calls.lock().unwrap();
    let (kind, action, params) = &calls[0];
    assert_eq!(*kind, ClientKind::Generic);
    assert_eq!(action, "DescribeWebProtectionData");
    assert_eq!(
        params,
        &json!({
            "StartTime": "2024-01-01T00:00:00Z",
            "EndTime": "2024-01-02T00:00:00Z",
            "MetricNames": ["ccAcl_interceptNum"],
            "ZoneIds": ["*"]
        })
    );
}

#[tokio::test]
async fn test_top_analysis_and_interval() {
    let (app_top, top_calls) = app(resolver(Some("id"), Some("key")), Ok(json!({})));
    get(app_top, "/traffic?metric=l7Flow_request_domain&interval=day").await;
    let (_, action, params) = top_calls.lock().unwrap()[0].clone();
    assert_eq!(action, "DescribeTopL7AnalysisData");
    assert_eq!(params["MetricName"], json!("l7Flow_request_domain"));
    assert!(params.get("MetricNames").is_none());
    assert!(params.get("Interval").is_none());

    let (app_pull, pull_calls) = app(resolver(Some("id"), Some("key")), Ok(json!({})));
    get(app_pull, "/traffic?metric=l7Flow_outFlux_hy&interval=hour").await;
    let (_, action, params) = pull_calls.lock().unwrap()[0].clone();
    assert_eq!(action, "DescribeTimingL7OriginPullData");
    assert_eq!(params["Interval"], json!("hour"));
}

#[tokio::test]
async fn test_config_defaults() {
    let (app, _) = app(resolver(None, None), Ok(json!({})));

    let (status, body) = get(app, "/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "siteName": DEFAULT_SITE_NAME, "siteIcon": DEFAULT_SITE_ICON })
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = app(resolver(None, None), Ok(json!({})));
    get(app.clone(), "/traffic").await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("traffic_requests_total"));
    assert!(text.contains("missing_credentials_total"));
}

#[tokio::test]
async fn test_signed_call_through_real_connector() {
    let captured: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();
    let sink = captured.clone();
    let fake = Router::new().route(
        "/",
        post(move |headers: axum::http::HeaderMap, Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                let action = headers["x-tc-action"].to_str().unwrap().to_string();
                sink.lock().unwrap().push((action, body));
                Json(json!({ "Response": { "Data": [1, 2, 3], "RequestId": "req" } }))
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, fake).await.unwrap() });

    let profile = ClientProfile {
        scheme: "http".to_string(),
        endpoint: addr.to_string(),
        ..ClientProfile::default()
    };
    let state = AppState::new(
        AppConfig::default(),
        resolver(Some("AKIDtest"), Some("secret")),
        Arc::new(TeoConnector::new(profile).unwrap()),
    );

    let (status, body) = get(router(state), "/traffic?metric=ccManage_interceptNum").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Data": [1, 2, 3], "RequestId": "req" }));
    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0, "DescribeWebProtectionData");
    assert_eq!(captured[0].1["MetricNames"], json!(["ccManage_interceptNum"]));
}
