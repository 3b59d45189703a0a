//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Handlers only see the [`TextGenerator`] trait, so tests can swap in a stub.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::GeminiSettings;

const USER_AGENT: &str = "snapboost-api/0.1";
const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{0}")]
    Request(String),
    #[error("Gemini API error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Failed to parse Gemini response: {0}")]
    Decode(String),
    #[error("Prompt was blocked: {0}")]
    Blocked(String),
    #[error("Gemini returned no text")]
    Empty,
}

// ── Collaborator seam ────────────────────────────────────────────────────────

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// ── Gemini implementation ────────────────────────────────────────────────────

pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self, GenerationError> {
        let model = normalize_model(&settings.model);
        let endpoint = generate_url(&settings.api_base, &model)?;

        let client = reqwest::ClientBuilder::new()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending prompt to Gemini");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Request(format!("TimeoutError: {}", e))
                } else if e.is_connect() {
                    GenerationError::Request(format!("ConnectError: {}", e))
                } else {
                    GenerationError::Request(format!("RequestError: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Decode(e.to_string()))?;

        extract_text(parsed)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Accept both `gemini-1.5-flash` and the fully qualified `models/gemini-1.5-flash`.
fn normalize_model(model: &str) -> String {
    let model = model.trim();
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

fn generate_url(base: &Url, model: &str) -> Result<Url, GenerationError> {
    base.join(&format!("models/{model}:generateContent"))
        .map_err(|e| GenerationError::Request(format!("invalid Gemini endpoint: {e}")))
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let candidate = match response.candidates.into_iter().next() {
        Some(c) => c,
        None => {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_default();
            if reason.is_empty() {
                return Err(GenerationError::Empty);
            }
            return Err(GenerationError::Blocked(reason));
        }
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        if matches!(reason.as_str(), "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT") {
            return Err(GenerationError::Blocked(reason));
        }
        return Err(GenerationError::Empty);
    }
    Ok(text)
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<String, GenerationError> {
        extract_text(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let text = parse(json!({
            "candidates": [
                {
                    "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                    "finishReason": "STOP"
                },
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let err = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap_err();
        assert!(matches!(err, GenerationError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn safety_stop_without_text_is_blocked() {
        let err = parse(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap_err();
        assert!(matches!(err, GenerationError::Blocked(_)));
    }

    #[test]
    fn missing_candidates_is_empty() {
        assert!(matches!(parse(json!({})), Err(GenerationError::Empty)));
        assert!(matches!(
            parse(json!({"candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]})),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn model_prefix_is_stripped() {
        assert_eq!(normalize_model("models/gemini-1.5-flash"), "gemini-1.5-flash");
        assert_eq!(normalize_model(" gemini-2.0-flash "), "gemini-2.0-flash");
    }

    #[test]
    fn endpoint_keeps_version_segment() {
        let base = Url::parse("https://generativelanguage.googleapis.com/v1beta/").unwrap();
        let url = generate_url(&base, "gemini-1.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn request_serializes_as_user_content() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn error_messages_are_readable() {
        let err = GenerationError::Upstream {
            status: 403,
            body: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini API error 403: API key not valid");
    }
}
