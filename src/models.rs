use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    pub event: String,
    pub choice: String,
}

#[derive(Debug, Deserialize)]
pub struct HashtagRequest {
    pub caption: String,
}

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    pub platform: String,
    pub niche: String,
    #[serde(alias = "audienceType")]
    pub audience_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ScriptRequest {
    #[serde(alias = "videoType")]
    pub video_type: String,
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailPromptRequest {
    pub topic: String,
    pub style: String,
    pub platform: String,
}

/// Key under which an endpoint reports generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultField {
    Caption,
    Hashtags,
    Ideas,
    Script,
    Prompt,
}

impl ResultField {
    pub fn key(self) -> &'static str {
        match self {
            ResultField::Caption => "caption",
            ResultField::Hashtags => "hashtags",
            ResultField::Ideas => "ideas",
            ResultField::Script => "script",
            ResultField::Prompt => "prompt",
        }
    }
}

/// Outcome of one generation endpoint. Both variants are served as `200 OK`;
/// callers tell them apart by the `error` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { field: ResultField, text: String },
    Failure { error: String },
}

impl GenerationResult {
    pub fn to_json(&self) -> Value {
        match self {
            GenerationResult::Success { field, text } => {
                let mut body = Map::new();
                body.insert(field.key().to_string(), Value::String(text.clone()));
                Value::Object(body)
            }
            GenerationResult::Failure { error } => json!({ "error": error }),
        }
    }
}

impl IntoResponse for GenerationResult {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.to_json())).into_response()
    }
}
