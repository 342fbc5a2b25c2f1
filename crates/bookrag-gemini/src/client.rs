//! Gemini client over the OpenAI-compatible REST surface

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use bookrag_core::{
    ChatCompleter, ChatMessage, CompletionConfig, Embedder, Error, Result, Settings,
};

use crate::TRACING_TARGET;

/// Client for an OpenAI-compatible endpoint (Gemini by default)
///
/// Construction never touches the network; credentials are checked on the
/// first request.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl GeminiClient {
    /// Create a new client bound to `base_url` and `api_key`
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Create a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.llm_base_url.clone(),
            settings.gemini_api_key.clone(),
            settings.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// The error string is safe to surface: it never contains the API key or
    /// the request URL's query string.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(target: TRACING_TARGET, %url, "sending request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.describe_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.describe_transport_error(e))?;

        if !status.is_success() {
            tracing::debug!(target: TRACING_TARGET, %status, "provider returned an error");
            return Err(match provider_error_message(&text) {
                Some(message) => format!("provider returned {}: {}", status, message),
                None => format!("provider returned {}", status),
            });
        }

        serde_json::from_str(&text).map_err(|e| format!("unexpected response body: {}", e))
    }

    fn describe_transport_error(&self, err: reqwest::Error) -> String {
        if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else if err.is_connect() {
            format!("could not connect to {}", self.base_url)
        } else {
            err.without_url().to_string()
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
///
/// Gemini sometimes wraps the object in a one-element array.
fn provider_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = match &value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    object
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest { model, input: text };

        let response: EmbeddingResponse = self
            .post_json("embeddings", &request)
            .await
            .map_err(Error::Embedding)?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Embedding("provider returned no embedding".to_string()))?;

        tracing::debug!(target: TRACING_TARGET, dimensions = embedding.len(), "embedded text");
        Ok(embedding)
    }
}

#[async_trait]
impl ChatCompleter for GeminiClient {
    async fn complete(&self, messages: &[ChatMessage], config: &CompletionConfig) -> Result<String> {
        let request = ChatRequest {
            model: &config.model,
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let response: ChatResponse = self
            .post_json("chat/completions", &request)
            .await
            .map_err(Error::Generation)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Generation("provider returned no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrag_core::Role;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/openai/",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.endpoint("embeddings"),
            "https://generativelanguage.googleapis.com/v1beta/openai/embeddings"
        );
    }

    #[test]
    fn test_provider_error_message_shapes() {
        assert_eq!(
            provider_error_message(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(
            provider_error_message(r#"[{"error":{"message":"model not found"}}]"#),
            Some("model not found".to_string())
        );
        assert_eq!(provider_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_chat_request_serialization() {
        let messages = vec![ChatMessage::system("frame"), ChatMessage::user("question")];
        let request = ChatRequest {
            model: "gemini-2.0-flash",
            messages: &messages,
            max_tokens: 1024,
            temperature: 0.5,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gemini-2.0-flash");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "question");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(messages[1].role, Role::User);
    }
}
