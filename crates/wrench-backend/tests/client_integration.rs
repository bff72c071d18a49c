//! Integration tests for `OllamaClient` error classification.
//!
//! A mock HTTP server simulates the three failure shapes the adapter must
//! keep apart: unreachable, non-2xx, and slow.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wrench_backend::OllamaClient;
use wrench_types::{BackendError, ChatMessage};

#[tokio::test]
async fn generate_returns_text_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "fn main() {}",
            "model": "llama3.2",
            "done": true
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2").unwrap();
    let generation = client.generate("write main", None).await.unwrap();
    assert_eq!(generation.response, "fn main() {}");
    assert!(generation.done);
}

#[tokio::test]
async fn generate_maps_non_2xx_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2").unwrap();
    let err = client.generate("hi", None).await.unwrap_err();
    match err {
        BackendError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "model exploded");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_maps_connection_refused_to_unavailable() {
    // Nothing listens on this port.
    let client = OllamaClient::new("http://127.0.0.1:1", "llama3.2").unwrap();
    let err = client.generate("hi", None).await.unwrap_err();
    assert!(matches!(err, BackendError::Unavailable { .. }));
}

#[tokio::test]
async fn generate_maps_slow_response_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(serde_json::json!({"response": "late"})),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2")
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client.generate("hi", None).await.unwrap_err();
    assert!(matches!(err, BackendError::Timeout { .. }));
}

#[tokio::test]
async fn generate_tolerates_empty_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "",
            "done": true
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2").unwrap();
    let generation = client.generate("hi", None).await.unwrap();
    assert!(generation.response.is_empty());
}

#[tokio::test]
async fn chat_prepends_system_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": {"role": "assistant", "content": "hello"},
            "done": true
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2").unwrap();
    let reply = client
        .chat(&[ChatMessage::user("hi")], Some("be terse"))
        .await
        .unwrap();
    assert_eq!(reply.content, "hello");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body.get("messages").unwrap().as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
}

#[tokio::test]
async fn availability_is_false_when_unreachable() {
    let client = OllamaClient::new("http://127.0.0.1:1", "llama3.2").unwrap();
    assert!(!client.is_available().await);
}

#[tokio::test]
async fn availability_requires_model_in_tag_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "llama3.2:latest"}, {"name": "codellama:7b"}]
        })))
        .mount(&server)
        .await;

    let present = OllamaClient::new(server.uri(), "llama3.2").unwrap();
    assert!(present.is_available().await);

    let absent = OllamaClient::new(server.uri(), "mistral").unwrap();
    assert!(!absent.is_available().await);
}
