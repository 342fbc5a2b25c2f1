//! Common types used across the bookrag system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::SearchHit;

/// Maximum characters kept in a citation snippet
pub const SNIPPET_CHARS: usize = 500;

/// Where a passage came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub title: Option<String>,
    pub url: Option<String>,
    pub metadata: serde_json::Value,
}

/// A search hit converted into a usable passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub id: String,
    pub text: String,
    pub score: f32,
    pub source: SourceMetadata,
}

impl RetrievedPassage {
    /// Build a passage from a raw hit payload.
    ///
    /// Text is read from `content`, falling back to `text`.
    pub fn from_hit(hit: SearchHit) -> Self {
        let payload = hit.payload;
        let text_field = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .filter(|s| !s.trim().is_empty())
        };

        let text = text_field("content")
            .or_else(|| text_field("text"))
            .unwrap_or_default();

        let source = SourceMetadata {
            title: text_field("title"),
            url: text_field("url"),
            metadata: payload
                .get("metadata")
                .cloned()
                .unwrap_or(serde_json::Value::Null),
        };

        Self {
            id: hit.id,
            text,
            score: hit.score,
            source,
        }
    }
}

/// A reference from an answer back to a source passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub snippet: String,
    pub relevance_score: f32,
}

impl Citation {
    /// Cite a passage. URLs that are neither http(s) nor site-relative are dropped;
    /// the score is clamped to [0, 1].
    pub fn from_passage(passage: &RetrievedPassage) -> Self {
        let url = passage
            .source
            .url
            .as_deref()
            .filter(|url| is_citable_url(url))
            .map(str::to_string);

        Self {
            document_id: passage.id.clone(),
            title: passage.source.title.clone(),
            url,
            snippet: truncate_chars(&passage.text, SNIPPET_CHARS).to_string(),
            relevance_score: passage.score.clamp(0.0, 1.0),
        }
    }
}

fn is_citable_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')
}

/// Truncate to at most `max` characters on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Per-call overrides for a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub top_k: Option<usize>,
    pub similarity_threshold: Option<f32>,
    /// Text the user highlighted; used to enrich both retrieval and the prompt
    pub selected_text: Option<String>,
}

impl QueryOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn with_selected_text(mut self, text: impl Into<String>) -> Self {
        self.selected_text = Some(text.into());
        self
    }
}

/// The answer to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub citations: Vec<Citation>,
    /// Mean similarity of the passages used, in [0, 1]
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub model: String,
}

/// Status of one external dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub ok: bool,
    pub detail: String,
}

impl ComponentStatus {
    pub fn healthy(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}

/// Result of a health check, keyed by component name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub components: BTreeMap<String, ComponentStatus>,
}

impl HealthReport {
    pub fn insert(&mut self, component: impl Into<String>, status: ComponentStatus) {
        self.components.insert(component.into(), status);
    }

    pub fn get(&self, component: &str) -> Option<&ComponentStatus> {
        self.components.get(component)
    }

    /// True when every component reported ok
    pub fn is_healthy(&self) -> bool {
        self.components.values().all(|status| status.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(payload: serde_json::Value) -> SearchHit {
        SearchHit {
            id: "42".to_string(),
            score: 0.81,
            payload,
        }
    }

    #[test]
    fn test_passage_from_full_payload() {
        let passage = RetrievedPassage::from_hit(hit(json!({
            "content": "ROS 2 parameters are declared per node.",
            "title": "Parameters",
            "url": "/docs/ros2/parameters",
            "metadata": {"chapter": 3}
        })));

        assert_eq!(passage.id, "42");
        assert_eq!(passage.text, "ROS 2 parameters are declared per node.");
        assert_eq!(passage.source.title.as_deref(), Some("Parameters"));
        assert_eq!(passage.source.url.as_deref(), Some("/docs/ros2/parameters"));
        assert_eq!(passage.source.metadata, json!({"chapter": 3}));
    }

    #[test]
    fn test_passage_text_fallback() {
        let passage = RetrievedPassage::from_hit(hit(json!({"text": "fallback body", "title": ""})));
        assert_eq!(passage.text, "fallback body");
        assert_eq!(passage.source.title, None);
        assert_eq!(passage.source.metadata, serde_json::Value::Null);
    }

    #[test]
    fn test_citation_drops_unusable_url() {
        let mut passage = RetrievedPassage::from_hit(hit(json!({
            "content": "body",
            "url": "javascript:alert(1)"
        })));
        assert_eq!(Citation::from_passage(&passage).url, None);

        passage.source.url = Some("https://example.com/book/ch1".to_string());
        assert_eq!(
            Citation::from_passage(&passage).url.as_deref(),
            Some("https://example.com/book/ch1")
        );
    }

    #[test]
    fn test_citation_snippet_truncated() {
        let long = "é".repeat(SNIPPET_CHARS + 20);
        let passage = RetrievedPassage::from_hit(hit(json!({ "content": long })));
        let citation = Citation::from_passage(&passage);
        assert_eq!(citation.snippet.chars().count(), SNIPPET_CHARS);
        assert_eq!(citation.relevance_score, 0.81);
    }

    #[test]
    fn test_citation_score_clamped() {
        let mut passage = RetrievedPassage::from_hit(hit(json!({ "content": "body" })));

        passage.score = 1.7;
        assert_eq!(Citation::from_passage(&passage).relevance_score, 1.0);

        passage.score = -0.3;
        assert_eq!(Citation::from_passage(&passage).relevance_score, 0.0);
    }

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn test_health_report() {
        let mut report = HealthReport::default();
        report.insert("vector_database", ComponentStatus::healthy("12 points"));
        assert!(report.is_healthy());

        report.insert("llm_endpoint", ComponentStatus::unhealthy("401 Unauthorized"));
        assert!(!report.is_healthy());
        assert!(!report.get("llm_endpoint").unwrap().ok);
    }
}
