//! Integration tests for System API endpoints.
//!
//! Tests health probes, build information and metrics access.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use newspulse::config::Config;
use tower::ServiceExt;

async fn spawn_app(config: Config) -> Router {
    let db_path =
        std::env::temp_dir().join(format!("newspulse-system-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = config;
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = newspulse::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    newspulse::api::router(state).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app(Config::default()).await;

    let (status, body_json) = get_json(&app, "/api/system/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body_json["success"].as_bool().unwrap_or(false));
    assert_eq!(body_json["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app(Config::default()).await;

    let (status, body_json) = get_json(&app, "/api/system/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_json["data"]["ready"], true);
    assert_eq!(body_json["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_about_hides_api_keys() {
    let mut config = Config::default();
    config.news.api_key = Some("super-secret-news-key".to_string());
    config.chat.model = "gemini-test".to_string();
    let app = spawn_app(config).await;

    let (status, body_json) = get_json(&app, "/api/system/about").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_json["data"]["name"], "newspulse");
    assert_eq!(body_json["data"]["chat_model"], "gemini-test");
    assert_eq!(body_json["data"]["news_configured"], true);
    assert_eq!(body_json["data"]["chat_configured"], false);
    assert!(!body_json.to_string().contains("super-secret-news-key"));
}

#[tokio::test]
async fn test_metrics_requires_auth() {
    let app = spawn_app(Config::default()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = spawn_app(Config::default()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("request id header");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
