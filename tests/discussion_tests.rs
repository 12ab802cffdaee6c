//! Integration tests for article discussion against a mocked Gemini API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use newspulse::config::Config;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";
const ARTICLE_URL: &str = "https://news.example.com/rover";

struct TestApp {
    router: Router,
    api_key: String,
}

async fn spawn_app(server: &MockServer) -> TestApp {
    let db_path = std::env::temp_dir().join(format!(
        "newspulse-discussion-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.chat.base_url = server.uri();
    config.chat.api_key = Some("test-key".to_string());

    let state = newspulse::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    let user = state
        .shared
        .auth_service
        .register("curious", "curious@example.com", "secret1")
        .await
        .expect("register");
    let api_key = state
        .shared
        .auth_service
        .get_api_key(user.id)
        .await
        .expect("api key");

    TestApp {
        router: newspulse::api::router(state).await,
        api_key,
    }
}

impl TestApp {
    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn article() -> Value {
    json!({
        "title": "Rover finds water ice",
        "description": "The rover drilled into a crater floor.",
        "url": ARTICLE_URL,
        "image": "https://news.example.com/rover.jpg",
        "publishedAt": "2025-06-01T10:00:00Z",
        "source": "Space Daily"
    })
}

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    }))
}

fn transcript_uri() -> String {
    format!("/api/discussion?url={}", urlencoding::encode(ARTICLE_URL))
}

#[tokio::test]
async fn test_ask_persists_both_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header_eq("x-goog-api-key", "test-key"))
        .and(body_string_contains("Rover finds water ice"))
        .respond_with(gemini_reply("  It was found near the south pole.  "))
        .expect(2)
        .mount(&server)
        .await;

    let app = spawn_app(&server).await;

    let (status, body) = app
        .post(
            "/api/discussion/ask",
            json!({"article": article(), "question": " Where was it found? "}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["answer"], "It was found near the south pole.");
    assert_eq!(body["data"]["failed"], false);
    let conversation_id = body["data"]["conversation_id"].clone();

    let (_, body) = app
        .post(
            "/api/discussion/ask",
            json!({"article": article(), "question": "How deep?"}),
        )
        .await;
    assert_eq!(body["data"]["conversation_id"], conversation_id);

    let (status, body) = app.get(&transcript_uri()).await;
    assert_eq!(status, StatusCode::OK);

    let turns: Vec<(&str, &str)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
        .collect();
    assert_eq!(
        turns,
        vec![
            ("user", "Where was it found?"),
            ("assistant", "It was found near the south pole."),
            ("user", "How deep?"),
            ("assistant", "It was found near the south pole."),
        ]
    );
}

#[tokio::test]
async fn test_failed_reply_is_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let app = spawn_app(&server).await;

    let (status, body) = app
        .post(
            "/api/discussion/ask",
            json!({"article": article(), "question": "Why?"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["failed"], true);
    let answer = body["data"]["answer"].as_str().unwrap();
    assert!(answer.starts_with("Gemini call failed:"));
    assert!(answer.contains("429"));

    let (_, body) = app.get(&transcript_uri()).await;
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], answer);
}

#[tokio::test]
async fn test_ask_validation() {
    let server = MockServer::start().await;
    let app = spawn_app(&server).await;

    let (status, _) = app
        .post(
            "/api/discussion/ask",
            json!({"article": article(), "question": "   "}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/discussion/ask",
            json!({"article": {"title": "No link"}, "question": "Why?"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get(&transcript_uri()).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_transcripts_are_per_article() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply("Sure."))
        .mount(&server)
        .await;

    let app = spawn_app(&server).await;

    let mut other = article();
    other["url"] = json!("https://news.example.com/other");
    app.post(
        "/api/discussion/ask",
        json!({"article": other, "question": "Elsewhere?"}),
    )
    .await;

    let (_, body) = app.get(&transcript_uri()).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_suggest_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Generate 3"))
        .respond_with(gemini_reply(
            "1. How was the ice detected?\n2. What happens next?\n\n3) Could it support a base?",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_app(&server).await;

    let (status, body) = app
        .post("/api/discussion/questions", json!({"article": article()}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["questions"],
        json!([
            "How was the ice detected?",
            "What happens next?",
            "Could it support a base?"
        ])
    );
}

#[tokio::test]
async fn test_summary_and_upstream_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Summarize"))
        .respond_with(gemini_reply("A rover found ice."))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_app(&server).await;

    let (status, body) = app
        .post("/api/discussion/summary", json!({"article": article()}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"], "A rover found ice.");

    // Blocked prompt: no candidates at all.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let (status, body) = app
        .post("/api/discussion/summary", json!({"article": article()}))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("SAFETY"));
}
