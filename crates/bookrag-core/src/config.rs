//! Process configuration
//!
//! [`Settings`] is built once at startup from environment-style key/value
//! pairs and shared read-only afterwards.

use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const QDRANT_URL: &str = "QDRANT_URL";
pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
pub const COLLECTION_NAME: &str = "COLLECTION_NAME";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
pub const DEFAULT_TOP_K: &str = "DEFAULT_TOP_K";
pub const DEFAULT_SIMILARITY_THRESHOLD: &str = "DEFAULT_SIMILARITY_THRESHOLD";
pub const DEBUG: &str = "DEBUG";
pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const MAX_TOKENS: &str = "MAX_TOKENS";
pub const TEMPERATURE: &str = "TEMPERATURE";

/// Gemini's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Immutable runtime configuration
#[derive(Clone, Serialize)]
pub struct Settings {
    #[serde(skip_serializing)]
    pub gemini_api_key: String,
    pub qdrant_url: String,
    #[serde(skip_serializing)]
    pub qdrant_api_key: String,
    pub collection_name: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub default_top_k: usize,
    pub default_similarity_threshold: f32,
    pub debug: bool,
    pub llm_base_url: String,
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Settings {
    /// Create settings with explicit credentials and default tuning
    pub fn new(
        gemini_api_key: impl Into<String>,
        qdrant_url: impl Into<String>,
        qdrant_api_key: impl Into<String>,
    ) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            qdrant_url: qdrant_url.into(),
            qdrant_api_key: qdrant_api_key.into(),
            collection_name: "book_content".to_string(),
            chat_model: "gemini-2.0-flash".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            default_top_k: 5,
            default_similarity_threshold: 0.7,
            debug: false,
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 60,
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| {
                Error::Configuration(format!("{} is not set or is empty", key))
            })
        };

        let mut settings = Self::new(
            required(GEMINI_API_KEY)?,
            required(QDRANT_URL)?,
            required(QDRANT_API_KEY)?,
        );

        if let Some(name) = optional(COLLECTION_NAME) {
            settings.collection_name = name;
        }
        if let Some(model) = optional(GEMINI_MODEL) {
            settings.chat_model = model;
        }
        if let Some(model) = optional(EMBEDDING_MODEL) {
            settings.embedding_model = model;
        }
        if let Some(raw) = optional(DEFAULT_TOP_K) {
            settings.default_top_k = parse_number(DEFAULT_TOP_K, &raw)?;
        }
        if let Some(raw) = optional(DEFAULT_SIMILARITY_THRESHOLD) {
            settings.default_similarity_threshold =
                parse_number(DEFAULT_SIMILARITY_THRESHOLD, &raw)?;
        }
        if let Some(raw) = optional(DEBUG) {
            settings.debug = parse_bool(DEBUG, &raw)?;
        }
        if let Some(url) = optional(GEMINI_BASE_URL) {
            settings.llm_base_url = url;
        }
        if let Some(raw) = optional(REQUEST_TIMEOUT_SECS) {
            settings.request_timeout_secs = parse_number(REQUEST_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = optional(MAX_TOKENS) {
            settings.max_tokens = parse_number(MAX_TOKENS, &raw)?;
        }
        if let Some(raw) = optional(TEMPERATURE) {
            settings.temperature = parse_number(TEMPERATURE, &raw)?;
        }

        settings.llm_base_url = settings.llm_base_url.trim_end_matches('/').to_string();
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges and URL shapes
    pub fn validate(&self) -> Result<()> {
        check_http_url(QDRANT_URL, &self.qdrant_url)?;
        check_http_url(GEMINI_BASE_URL, &self.llm_base_url)?;

        if self.default_top_k == 0 {
            return Err(Error::Configuration(format!(
                "{} must be greater than zero",
                DEFAULT_TOP_K
            )));
        }
        if !(0.0..=1.0).contains(&self.default_similarity_threshold) {
            return Err(Error::Configuration(format!(
                "{} must be between 0 and 1, got {}",
                DEFAULT_SIMILARITY_THRESHOLD, self.default_similarity_threshold
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Configuration(format!(
                "{} must be greater than zero",
                REQUEST_TIMEOUT_SECS
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::Configuration(format!(
                "{} must be greater than zero",
                MAX_TOKENS
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Configuration(format!(
                "{} must be between 0 and 2, got {}",
                TEMPERATURE, self.temperature
            )));
        }

        Ok(())
    }

    /// Timeout applied to every outbound request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &"<redacted>")
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_api_key", &"<redacted>")
            .field("collection_name", &self.collection_name)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("default_top_k", &self.default_top_k)
            .field("default_similarity_threshold", &self.default_similarity_threshold)
            .field("debug", &self.debug)
            .field("llm_base_url", &self.llm_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Configuration(format!("{} has an invalid value: {:?}", key, raw)))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "{} must be a boolean, got {:?}",
            key, raw
        ))),
    }
}

fn check_http_url(key: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Configuration(format!("{} is not a valid URL: {}", key, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Configuration(format!(
            "{} must use http or https, got {}",
            key, other
        ))),
    }
}
