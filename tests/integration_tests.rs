use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use promptwiz::config::GeminiConfig;
use promptwiz::providers::GeminiClient;
use promptwiz::server::{GENERATE_PATH, SYSTEM_PATH, TOOLS_PATH};
use promptwiz::{build_router, catalog, normalize, AppState, CredentialPool};

const MODEL_PATH: &str = "/models/gemini-test:generateContent";

/// Gemini envelope with one text part
fn gemini_body(text: &str) -> Value
{   json!({
      "candidates": [{
        "content": {"parts": [{"text": text}], "role": "model"},
        "finishReason": "STOP"
      }]
    })
}

fn three_variants() -> Value
{   json!({
      "prompts": [
        {"title": "Golden hour", "description": "Warm", "prompt": "A dog runs at sunset."},
        {"title": "Drone", "description": "Aerial", "prompt": "An aerial shot of a dog."},
        {"title": "Slow motion", "description": "Detail", "prompt": "Sand kicks up in slow motion."}
      ]
    })
}

fn app(server: &MockServer, keys: &[&str], timeout_secs: u64) -> Router
{   let client = GeminiClient::new(GeminiConfig
    {   api_base: server.uri()
      , model: "gemini-test".to_string()
      , attempt_timeout_secs: timeout_secs
    });
    let pool = CredentialPool::from_sources(keys.iter().map(|k| Some(*k)));
    build_router(AppState::new(Arc::new(client), Arc::new(pool)))
}

fn post_json(body: Value) -> Request<Body>
{   Request::builder()
      .method(Method::POST)
      .uri(GENERATE_PATH)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
}

async fn send(app: Router, req: Request<Body>)
  -> (StatusCode, axum::http::HeaderMap, Vec<u8>)
{   let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_fenced_json_yields_three_variants()
{   let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", three_variants());
    Mock::given(method("POST"))
      .and(path(MODEL_PATH))
      .and(header_eq("x-goog-api-key", "key-one-aaaaaaaa"))
      .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&fenced)))
      .expect(1)
      .mount(&server)
      .await;

    let (status, _, body) = send(
      app(&server, &["key-one-aaaaaaaa"], 5),
      post_json(json!({"userMessage": "a dog running on a beach"})),
    ).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, three_variants());
}

#[tokio::test]
async fn test_falls_over_to_second_key_and_wraps_prose()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "first-key-111111"))
      .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "second-key-22222"))
      .respond_with(ResponseTemplate::new(200)
        .set_body_json(gemini_body("A dog sprints across wet sand.")))
      .expect(1)
      .mount(&server)
      .await;

    let (status, _, body) = send(
      app(&server, &["first-key-111111", "second-key-22222"], 5),
      post_json(json!({"userMessage": "a dog", "mode": "creation"})),
    ).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let prompts = body["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["prompt"], "A dog sprints across wet sand.");
    assert_eq!(prompts[0]["title"], normalize::FALLBACK_TITLE);
}

#[tokio::test]
async fn test_all_keys_failing_returns_500_without_secrets()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
      .expect(2)
      .mount(&server)
      .await;

    let (status, _, body) = send(
      app(&server, &["secret-alpha-0001", "secret-bravo-0002"], 5),
      post_json(json!({"userMessage": "city at night"})),
    ).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("secret-alpha-0001"));
    assert!(!text.contains("secret-bravo-0002"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"], "Failed to generate prompt");
    assert!(body["message"].as_str().unwrap().contains("overloaded"));
}

#[tokio::test]
async fn test_timed_out_attempt_moves_to_next_key()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "slow-key-0000000"))
      .respond_with(ResponseTemplate::new(200)
        .set_body_json(gemini_body("too late"))
        .set_delay(Duration::from_secs(3)))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "fast-key-0000000"))
      .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("on time")))
      .expect(1)
      .mount(&server)
      .await;

    let (status, _, body) = send(
      app(&server, &["slow-key-0000000", "fast-key-0000000"], 1),
      post_json(json!({"userMessage": "a race"})),
    ).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["prompts"][0]["prompt"], "on time");
}

#[tokio::test]
async fn test_success_without_text_counts_as_failure()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "blocked-key-0000"))
      .respond_with(ResponseTemplate::new(200)
        .set_body_json(json!({"candidates": [{"finishReason": "SAFETY"}]})))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .and(header_eq("x-goog-api-key", "backup-key-00000"))
      .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("fine")))
      .expect(1)
      .mount(&server)
      .await;

    let (status, _, _) = send(
      app(&server, &["blocked-key-0000", "backup-key-00000"], 5),
      post_json(json!({"userMessage": "anything"})),
    ).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_message_is_rejected_before_upstream()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("x")))
      .expect(0)
      .mount(&server)
      .await;

    for body in [json!({}), json!({"userMessage": ""}), json!({"userMessage": "  "}), json!({"mode": "edit"})]
    {   let (status, _, resp) = send(
          app(&server, &["some-key-00000000"], 5),
          post_json(body),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let resp: Value = serde_json::from_slice(&resp).unwrap();
        assert_eq!(resp["error"], "User message is required");
    }

    let garbage = Request::builder()
      .method(Method::POST)
      .uri(GENERATE_PATH)
      .body(Body::from("not json"))
      .unwrap();
    let (status, _, _) = send(app(&server, &["some-key-00000000"], 5), garbage).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_pool_fails_without_upstream_call()
{   let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("x")))
      .expect(0)
      .mount(&server)
      .await;

    let (status, _, body) = send(
      app(&server, &[], 5),
      post_json(json!({"userMessage": "hello"})),
    ).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Failed to generate prompt");
}

#[tokio::test]
async fn test_options_succeeds_with_empty_pool()
{   let server = MockServer::start().await;
    let req = Request::builder()
      .method(Method::OPTIONS)
      .uri(GENERATE_PATH)
      .body(Body::empty())
      .unwrap();

    let (status, headers, body) = send(app(&server, &[], 5), req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
      .to_str()
      .unwrap();
    assert!(allowed.contains("POST"));
    assert!(allowed.contains("OPTIONS"));
}

#[tokio::test]
async fn test_options_on_catalogs_lists_get()
{   let server = MockServer::start().await;
    for uri in [TOOLS_PATH, SYSTEM_PATH]
    {   let req = Request::builder()
          .method(Method::OPTIONS)
          .uri(uri)
          .body(Body::empty())
          .unwrap();

        let (status, headers, body) = send(app(&server, &[], 5), req).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
          .to_str()
          .unwrap();
        assert!(allowed.contains("GET"));
        assert!(!allowed.contains("POST"));
    }
}

#[tokio::test]
async fn test_cors_preflight_is_answered()
{   let server = MockServer::start().await;
    let req = Request::builder()
      .method(Method::OPTIONS)
      .uri(GENERATE_PATH)
      .header(header::ORIGIN, "http://localhost:3000")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .body(Body::empty())
      .unwrap();

    let (status, headers, body) = send(app(&server, &[], 5), req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_wrong_method_is_405()
{   let server = MockServer::start().await;
    let req = Request::builder()
      .method(Method::GET)
      .uri(GENERATE_PATH)
      .body(Body::empty())
      .unwrap();

    let (status, _, body) = send(app(&server, &["k-000000000000"], 5), req).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Method not allowed");

    let req = Request::builder()
      .method(Method::DELETE)
      .uri(TOOLS_PATH)
      .body(Body::empty())
      .unwrap();
    let (status, _, _) = send(app(&server, &[], 5), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_catalogs_are_served_verbatim()
{   let server = MockServer::start().await;
    for (uri, expected) in [
      (TOOLS_PATH, catalog::all_tools_schema()),
      (SYSTEM_PATH, catalog::video_prompt_system()),
    ]
    {   let req = Request::builder()
          .uri(uri)
          .body(Body::empty())
          .unwrap();
        let (status, headers, body) = send(app(&server, &[], 5), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(body, expected.as_bytes());
    }
}

#[tokio::test]
async fn test_health()
{   let server = MockServer::start().await;
    let req = Request::builder()
      .uri("/health")
      .body(Body::empty())
      .unwrap();
    let (status, _, body) = send(app(&server, &[], 5), req).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
