//! Wiremock integration tests for the provider adapters.
//!
//! These verify wire format, auth headers, buffered-vs-streamed handling,
//! and error wrapping against mocked upstream servers.

use std::time::Duration;

use futures_util::StreamExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_router::{
    AnthropicAdapter, OllamaAdapter, OpenAiCompatAdapter, ProviderAdapter, ProviderReply,
    RouterError,
};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn ollama_buffered_request() {
    let server = MockServer::start().await;
    let upstream = serde_json::json!({"model": "codellama", "response": "fn main() {}"});

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "codellama",
            "prompt": "complete this",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
        .mount(&server)
        .await;

    let adapter = OllamaAdapter::with_base_url(server.uri(), TIMEOUT);
    let reply = adapter
        .send("complete this", "codellama", "", false)
        .await
        .expect("send should succeed");

    match reply {
        ProviderReply::Buffered(payload) => assert_eq!(payload, upstream),
        other => panic!("expected buffered reply, got {other:?}"),
    }
}

#[tokio::test]
async fn ollama_streaming_relays_body_bytes() {
    let server = MockServer::start().await;
    let body = "{\"response\":\"fn\"}\n{\"response\":\" main\"}\n";

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let adapter = OllamaAdapter::with_base_url(server.uri(), TIMEOUT);
    let reply = adapter
        .send("complete this", "codellama", "", true)
        .await
        .expect("send should succeed");

    let mut stream = match reply {
        ProviderReply::Stream(stream) => stream,
        other => panic!("expected stream reply, got {other:?}"),
    };

    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.expect("chunk"));
    }
    assert_eq!(collected, body.as_bytes());
}

#[tokio::test]
async fn openai_compat_sends_bearer_token() {
    let server = MockServer::start().await;
    let upstream = serde_json::json!({"choices": [{"message": {"content": "done"}}]});

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "refactor"}],
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
        .mount(&server)
        .await;

    let adapter = OpenAiCompatAdapter::with_base_url("openai", server.uri(), TIMEOUT);
    let reply = adapter
        .send("refactor", "gpt-4o", "sk-test", false)
        .await
        .expect("send should succeed");

    match reply {
        ProviderReply::Buffered(payload) => assert_eq!(payload, upstream),
        other => panic!("expected buffered reply, got {other:?}"),
    }
}

#[tokio::test]
async fn anthropic_sends_custom_auth_headers() {
    let server = MockServer::start().await;
    let upstream = serde_json::json!({"content": [{"type": "text", "text": "done"}]});

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-sonnet-4",
            "max_tokens": 1024,
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
        .mount(&server)
        .await;

    let adapter = AnthropicAdapter::with_base_url(server.uri(), TIMEOUT);
    let reply = adapter
        .send("refactor", "claude-sonnet-4", "sk-ant-test", false)
        .await
        .expect("send should succeed");

    match reply {
        ProviderReply::Buffered(payload) => assert_eq!(payload, upstream),
        other => panic!("expected buffered reply, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_becomes_upstream_error_naming_the_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let adapter = OpenAiCompatAdapter::with_base_url("mistral", server.uri(), TIMEOUT);
    let err = adapter
        .send("refactor", "mistral-large", "bad-key", false)
        .await
        .unwrap_err();

    assert!(!err.is_client_error());
    match err {
        RouterError::Upstream { provider, message } => {
            assert_eq!(provider, "mistral");
            assert!(message.contains("401"), "message was: {message}");
            assert!(message.contains("invalid api key"), "message was: {message}");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_becomes_upstream_error() {
    // Port 1 is never listening.
    let adapter = OllamaAdapter::with_base_url("http://127.0.0.1:1", TIMEOUT);
    let err = adapter
        .send("complete this", "codellama", "", false)
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::Upstream { provider: "ollama", .. }));
    assert!(err.to_string().starts_with("ollama error:"));
}
