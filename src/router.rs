use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::gemini::{GenerationError, TextGenerator};
use crate::models::{
    CaptionRequest, GenerationResult, HashtagRequest, IdeaRequest, ResultField, ScriptRequest,
    ThumbnailPromptRequest,
};
use crate::prompts;

pub const HEALTH_MESSAGE: &str = "✅ SnapBoost AI backend is running!";
pub const SCRIPT_FAILURE_MESSAGE: &str = "❌ Failed to generate script. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

pub fn build_router(state: AppState, frontend_origin: HeaderValue) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/generate-caption/", post(generate_caption))
        .route("/generate-hashtags/", post(generate_hashtags))
        .route("/generate-ideas/", post(generate_ideas))
        .route("/generate-script/", post(generate_script))
        .route("/generate-thumbnail-prompt/", post(generate_thumbnail_prompt))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_origin))
        .with_state(state)
}

/// Single allowed origin with credentials. Other origins get no CORS headers.
/// Methods and headers mirror the preflight, since wildcards are rejected when
/// credentials are allowed.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "message": HEALTH_MESSAGE }))
}

async fn generate_caption(
    State(state): State<AppState>,
    Json(req): Json<CaptionRequest>,
) -> GenerationResult {
    let prompt = prompts::caption_prompt(&req);
    run(&state, "caption", prompt, ResultField::Caption, |e| {
        format!("❌ Failed to generate caption. Reason: {e}")
    })
    .await
}

async fn generate_hashtags(
    State(state): State<AppState>,
    Json(req): Json<HashtagRequest>,
) -> GenerationResult {
    let prompt = prompts::hashtag_prompt(&req);
    run(&state, "hashtags", prompt, ResultField::Hashtags, |e| e.to_string()).await
}

async fn generate_ideas(
    State(state): State<AppState>,
    Json(req): Json<IdeaRequest>,
) -> GenerationResult {
    let prompt = prompts::idea_prompt(&req);
    run(&state, "ideas", prompt, ResultField::Ideas, |e| {
        format!("❌ Failed to generate ideas. Reason: {e}")
    })
    .await
}

// Upstream detail is withheld from script callers; it still reaches the log.
async fn generate_script(
    State(state): State<AppState>,
    Json(req): Json<ScriptRequest>,
) -> GenerationResult {
    let prompt = prompts::script_prompt(&req);
    run(&state, "script", prompt, ResultField::Script, |_| {
        SCRIPT_FAILURE_MESSAGE.to_string()
    })
    .await
}

async fn generate_thumbnail_prompt(
    State(state): State<AppState>,
    Json(req): Json<ThumbnailPromptRequest>,
) -> GenerationResult {
    let prompt = prompts::thumbnail_prompt(&req);
    run(&state, "thumbnail_prompt", prompt, ResultField::Prompt, |e| e.to_string()).await
}

/// One generation round trip: exactly one collaborator call, no retries.
async fn run<F>(
    state: &AppState,
    endpoint: &'static str,
    prompt: String,
    field: ResultField,
    describe_error: F,
) -> GenerationResult
where
    F: FnOnce(&GenerationError) -> String,
{
    match state.generator.generate(&prompt).await {
        Ok(text) => GenerationResult::Success {
            field,
            text: text.trim().to_string(),
        },
        Err(e) => {
            tracing::error!(endpoint, error = %e, "generation failed");
            GenerationResult::Failure {
                error: describe_error(&e),
            }
        }
    }
}
