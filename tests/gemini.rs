use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use snapboost_api::config::GeminiSettings;
use snapboost_api::gemini::{GeminiClient, GenerationError, TextGenerator};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
    let settings = GeminiSettings {
        api_key: "test-key".to_string(),
        model: "models/gemini-1.5-flash".to_string(),
        api_base: Url::parse(&format!("{}/v1beta/", server.uri())).unwrap(),
        timeout,
    };
    GeminiClient::new(&settings).unwrap()
}

#[tokio::test]
async fn sends_prompt_with_api_key_to_model_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Write a caption"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Launch "}, {"text": "day!"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    assert_eq!(client.model(), "gemini-1.5-flash");

    let text = client.generate("Write a caption").await.unwrap();
    assert_eq!(text, "Launch day!");
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate("hi")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Upstream { status: 403, ref body } if body == "API key not valid"
    ));
    assert_eq!(err.to_string(), "Gemini API error 403: API key not valid");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate("hi")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Decode(_)));
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate("hi")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Prompt was blocked: SAFETY");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_millis(200))
        .generate("hi")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Request(_)));
    assert!(err.to_string().starts_with("TimeoutError:"), "{err}");
}
