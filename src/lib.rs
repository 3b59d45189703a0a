pub mod config;
pub mod gemini;
pub mod models;
pub mod prompts;
pub mod router;
