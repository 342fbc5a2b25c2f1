//! Connection/config provider
//!
//! Loads [`Settings`] once and binds a [`GeminiClient`] to them.

use std::sync::Arc;

use bookrag_core::{Result, Settings};

use crate::{GeminiClient, TRACING_TARGET};

/// Loaded settings plus a ready-to-use LLM client
#[derive(Clone)]
pub struct Connection {
    pub settings: Arc<Settings>,
    pub client: Arc<GeminiClient>,
}

impl Connection {
    /// Bind a client to already-validated settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = GeminiClient::from_settings(&settings)?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %settings.llm_base_url,
            chat_model = %settings.chat_model,
            embedding_model = %settings.embedding_model,
            "LLM client configured"
        );

        Ok(Self {
            settings: Arc::new(settings),
            client: Arc::new(client),
        })
    }
}

/// Read configuration from `.env` and the process environment
///
/// Fails with a configuration error when `GEMINI_API_KEY`, `QDRANT_URL` or
/// `QDRANT_API_KEY` is missing or empty.
pub fn load_configuration() -> Result<Connection> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    Connection::from_settings(settings)
}
