use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use url::Url;

// ── Defaults ─────────────────────────────────────────────────────────────────

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_FRONTEND_ORIGIN: &str = "https://snapboost-frontend-2.vercel.app";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a socket address: {0}")]
    BindAddr(String),
    #[error("FRONTEND_ORIGIN is not a valid origin: {0}")]
    FrontendOrigin(String),
    #[error("GEMINI_API_BASE is not a valid URL: {0}")]
    ApiBase(String),
    #[error("GEMINI_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    Timeout(String),
}

// ── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub frontend_origin: HeaderValue,
    pub gemini: GeminiSettings,
}

impl Config {
    /// Load settings from the process environment, after merging in a `.env`
    /// file when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or blank values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_raw.clone()))?;

        let origin_raw = get("FRONTEND_ORIGIN", DEFAULT_FRONTEND_ORIGIN);
        let frontend_origin = parse_origin(&origin_raw)?;

        // A trailing slash keeps `Url::join` from dropping the version segment.
        let mut base_raw = get("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE);
        if !base_raw.ends_with('/') {
            base_raw.push('/');
        }
        let api_base = Url::parse(&base_raw).map_err(|e| ConfigError::ApiBase(e.to_string()))?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::ApiBase(base_raw));
        }

        let timeout_raw = get("GEMINI_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
        let timeout_secs: u64 = timeout_raw
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::Timeout(timeout_raw.clone()))?;

        Ok(Config {
            bind_addr,
            frontend_origin,
            gemini: GeminiSettings {
                api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
                model: get("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_origin(raw: &str) -> Result<HeaderValue, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::FrontendOrigin(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::FrontendOrigin(raw.to_string()));
    }
    // Browsers send the origin without a trailing slash or path.
    let origin = url.origin().ascii_serialization();
    HeaderValue::from_str(&origin).map_err(|_| ConfigError::FrontendOrigin(raw.to_string()))
}
