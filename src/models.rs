//! Data models and structures
//!
//! Defines the request payloads accepted over HTTP and the environment-driven
//! service configuration.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Event description supplied with an upload, reused for every regeneration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event_type: String,
    pub venue: String,
    pub theme: String,
}

impl EventDetails {
    pub fn new(
        event_type: impl Into<String>,
        venue: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            venue: venue.into(),
            theme: theme.into(),
        }
    }

    /// Rejects blank fields; no other format checks are applied.
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("eventType", &self.event_type),
            ("venue", &self.venue),
            ("theme", &self.theme),
        ] {
            if value.trim().is_empty() {
                return Err(crate::Error::Validation(format!(
                    "Missing required field '{}'.",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapStyleRequest {
    pub style_index: i64,
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_STYLE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://dreswap-ui.vercel.app,http://localhost:3000";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub style_model: String,
    pub image_model: String,
    pub style_count: usize,
    pub session_capacity: NonZeroUsize,
    pub ai_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .ok_or_else(|| {
                crate::Error::Config(
                    "GEMINI_API_KEY or GOOGLE_API_KEY environment variable not set".to_string(),
                )
            })?;

        let style_count = parse_var(&get, "STYLE_COUNT", 5usize)?;
        if style_count == 0 {
            return Err(crate::Error::Config(
                "STYLE_COUNT must be at least 1".to_string(),
            ));
        }

        let session_capacity = NonZeroUsize::new(parse_var(&get, "SESSION_CAPACITY", 1000usize)?)
            .ok_or_else(|| {
                crate::Error::Config("SESSION_CAPACITY must be at least 1".to_string())
            })?;

        Ok(Self {
            gemini_api_key,
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            style_model: get("STYLE_MODEL").unwrap_or_else(|| DEFAULT_STYLE_MODEL.to_string()),
            image_model: get("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            style_count,
            session_capacity,
            ai_timeout: Duration::from_secs(parse_var(&get, "AI_TIMEOUT_SECS", 120u64)?),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&get, "PORT", 8081u16)?,
            allowed_origins: get("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> crate::Result<T>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            crate::Error::Config(format!("{} has an invalid value: '{}'", key, raw))
        }),
        None => Ok(default),
    }
}
