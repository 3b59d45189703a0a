//! Prompt templates and the discriminators that pick between them.

use crate::models::{
    CaptionRequest, HashtagRequest, IdeaRequest, ScriptRequest, ThumbnailPromptRequest,
};

type Template = fn(&str) -> String;

// ── Caption / idea / launch plan ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionChoice {
    Caption,
    Idea,
    LaunchPlan,
    Other,
}

impl CaptionChoice {
    /// Unrecognised values map to `Other` rather than failing.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "caption" => CaptionChoice::Caption,
            "idea" => CaptionChoice::Idea,
            "launch plan" => CaptionChoice::LaunchPlan,
            _ => CaptionChoice::Other,
        }
    }

    fn template(self) -> Template {
        match self {
            CaptionChoice::Caption => |event: &str| {
                format!("Write a short, catchy social media caption for the launch of: {event}")
            },
            CaptionChoice::Idea => {
                |event: &str| format!("Give me creative marketing ideas for the launch of: {event}")
            }
            CaptionChoice::LaunchPlan => {
                |event: &str| format!("Create a simple and effective launch plan for: {event}")
            }
            CaptionChoice::Other => {
                |event: &str| format!("Tell me something helpful related to: {event}")
            }
        }
    }
}

pub fn caption_prompt(req: &CaptionRequest) -> String {
    CaptionChoice::parse(&req.choice).template()(&req.event)
}

// ── Hashtags ─────────────────────────────────────────────────────────────────

pub fn hashtag_prompt(req: &HashtagRequest) -> String {
    format!(
        "Generate a list of high-engagement social media hashtags based on the following caption.\n\
         Avoid spaces and return only the hashtags in Python list format.\n\
         Caption: {}",
        req.caption
    )
}

// ── Content ideas ────────────────────────────────────────────────────────────

pub fn idea_prompt(req: &IdeaRequest) -> String {
    format!(
        "You are a creative AI assistant for content creators. Generate 10 unique and viral content ideas for {} creators\n\
         in the \"{}\" niche. Each idea should be engaging, suitable for the {}, and relevant to current trends.\n\
         Output the ideas as a numbered list.",
        req.platform, req.niche, req.audience_type
    )
}

// ── Video scripts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    ShortForm,
    LongForm,
}

impl VideoFormat {
    /// Expects an already trimmed and lower-cased video type.
    pub fn detect(video_type: &str) -> Self {
        if video_type.contains("short") || video_type.contains("reel") {
            VideoFormat::ShortForm
        } else {
            VideoFormat::LongForm
        }
    }
}

pub fn script_prompt(req: &ScriptRequest) -> String {
    let video_type = req.video_type.trim().to_lowercase();
    let topic = req.topic.trim();

    match VideoFormat::detect(&video_type) {
        VideoFormat::ShortForm => format!(
            "Generate an engaging script for a 1-minute {video_type} about \"{topic}\".\n\
             The script should have an attention-grabbing hook in the first few seconds,\n\
             use a casual and high-energy tone, include visual/action suggestions,\n\
             and end with a strong call to action."
        ),
        VideoFormat::LongForm => format!(
            "Generate a detailed script for a YouTube video about \"{topic}\".\n\
             The script should last about 10 minutes and include:\n\
             - Hook in the intro\n\
             - Structured explanation in sections\n\
             - Engaging storytelling tone\n\
             - Visual suggestions for each section\n\
             - Call to action at the end\n\
             Format the response as a script with timestamps."
        ),
    }
}

// ── Thumbnail prompts ────────────────────────────────────────────────────────

pub fn thumbnail_prompt(req: &ThumbnailPromptRequest) -> String {
    format!(
        "Generate a detailed and visually rich prompt for an AI image generator to create a thumbnail for a {} video.\n\
         Topic: \"{}\"\n\
         Style: {}\n\
         Focus on visual details like colors, elements, facial expressions, mood, typography, and composition.\n\
         Avoid text in the prompt itself unless required.",
        req.platform, req.topic, req.style
    )
}
