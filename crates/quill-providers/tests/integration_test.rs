//! Integration tests for quill-providers crate.
//!
//! The HTTP clients are pointed at a `wiremock` server standing in for the
//! OpenAI and OpenRouter APIs.

use quill_common::test_utils::init_test_logging;
use quill_common::RetryPolicy;
use quill_providers::{
    ApiSettings, CompletionProvider, CompletionRequest, ImageOptions, ImageRequest, OpenAiClient,
    OpenRouterClient, ProviderError, TextModel,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer, attempts: usize) -> ApiSettings {
    ApiSettings::new(&format!("{}/v1", server.uri()), "sk-test")
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryPolicy::fixed(attempts, Duration::from_millis(5)))
}

fn chat(model: TextModel) -> CompletionRequest {
    CompletionRequest::new(model, "fix this sentence", "You fix grammar.", 0.7)
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn hits(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

#[tokio::test]
async fn test_openai_completion_round_trip() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o", "top_p": 1.0})))
        .respond_with(completion("\n Fixed sentence. "))
        .expect(1)
        .mount(&server)
        .await;
    let client = OpenAiClient::new(settings(&server, 1)).unwrap();

    let text = client.complete(chat(TextModel::Gpt4o)).await.unwrap();

    assert_eq!(text, "Fixed sentence.");
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You fix grammar.");
    assert_eq!(body["messages"][1]["content"], "fix this sentence");
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("ok"))
        .expect(1)
        .mount(&server)
        .await;
    let client = OpenAiClient::new(settings(&server, 3)).unwrap();

    let text = client.complete(chat(TextModel::Gpt4oMini)).await.unwrap();

    assert_eq!(text, "ok");
    assert_eq!(hits(&server).await, 2);
}

#[tokio::test]
async fn test_content_policy_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "content_policy_violation",
                "message": "Your request was rejected as a result of our safety system."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = OpenAiClient::new(settings(&server, 3)).unwrap();

    let err = client
        .generate_image(ImageRequest::new("forbidden", ImageOptions::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ContentPolicy { .. }));
    assert_eq!(
        err.detail().as_deref(),
        Some("Your request was rejected as a result of our safety system.")
    );
    assert_eq!(hits(&server).await, 1);
}

#[tokio::test]
async fn test_image_url_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "size": "1024x1024",
            "n": 1,
            "quality": "standard",
            "style": "vivid"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "data": [{"url": "https://images.example/abc.png"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = OpenAiClient::new(settings(&server, 1)).unwrap();

    let url = client
        .generate_image(ImageRequest::new("a red fox", ImageOptions::default()))
        .await
        .unwrap();

    assert_eq!(url, "https://images.example/abc.png");
}

#[tokio::test]
async fn test_openrouter_sends_deepseek_model_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "deepseek/deepseek-chat"})))
        .respond_with(completion("deep answer"))
        .expect(1)
        .mount(&server)
        .await;
    let client = OpenRouterClient::new(settings(&server, 1)).unwrap();

    let text = client.complete(chat(TextModel::DeepSeek)).await.unwrap();

    assert_eq!(text, "deep answer");
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("top_p").is_none());
}

#[tokio::test]
async fn test_rate_limit_exhausts_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"message": "Rate limit reached"}})),
        )
        .expect(2)
        .mount(&server)
        .await;
    let client = OpenAiClient::new(settings(&server, 2)).unwrap();

    let err = client.complete(chat(TextModel::Gpt4o)).await.unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { .. }));
    assert_eq!(hits(&server).await, 2);
}
