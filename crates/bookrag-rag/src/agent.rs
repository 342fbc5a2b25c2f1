//! Retrieval-augmented question answering agent

use std::sync::Arc;
use std::time::Instant;

use bookrag_core::{
    ChatCompleter, CompletionConfig, ComponentStatus, Embedder, Error, HealthReport,
    QueryOptions, QueryResult, Result, RetrievedPassage, Settings, Stage, VectorSearcher,
    truncate_chars,
};

use crate::TRACING_TARGET_AGENT;
use crate::prompt::{self, FALLBACK_ANSWER};

/// Longest accepted query, in characters
pub const MAX_QUERY_CHARS: usize = 2000;

/// Longest accepted selected text, in characters
pub const MAX_SELECTED_TEXT_CHARS: usize = 5000;

/// Health report key for the vector database
pub const VECTOR_DATABASE: &str = "vector_database";

/// Health report key for the LLM endpoint
pub const LLM_ENDPOINT: &str = "llm_endpoint";

/// Inputs that passed validation, with defaults resolved
struct ValidatedQuery<'a> {
    query: &'a str,
    selected_text: Option<&'a str>,
    top_k: usize,
    threshold: f32,
}

/// Orchestrates embed → search → filter → prompt → complete
///
/// The agent holds no mutable state; one instance can serve concurrent
/// queries.
pub struct RagAgent<E, S, C> {
    settings: Arc<Settings>,
    embedder: Arc<E>,
    searcher: Arc<S>,
    completer: Arc<C>,
}

impl<E, S, C> RagAgent<E, S, C>
where
    E: Embedder,
    S: VectorSearcher,
    C: ChatCompleter,
{
    /// Create a new agent
    pub fn new(settings: Arc<Settings>, embedder: Arc<E>, searcher: Arc<S>, completer: Arc<C>) -> Self {
        Self {
            settings,
            embedder,
            searcher,
            completer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Probe the vector database and the LLM endpoint.
    ///
    /// Never fails: each probe reports its own status.
    pub async fn health_check(&self) -> HealthReport {
        let (vector_database, llm_endpoint) =
            tokio::join!(self.check_vector_database(), self.check_llm_endpoint());

        let mut report = HealthReport::default();
        report.insert(VECTOR_DATABASE, vector_database);
        report.insert(LLM_ENDPOINT, llm_endpoint);
        report
    }

    async fn check_vector_database(&self) -> ComponentStatus {
        let collection = &self.settings.collection_name;

        match self.searcher.collection_info(collection).await {
            Ok(info) => ComponentStatus::healthy(match info.points_count {
                Some(count) => format!("collection `{}` reachable ({} points)", info.name, count),
                None => format!("collection `{}` reachable", info.name),
            }),
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET_AGENT, error = %e, "vector database health check failed");
                ComponentStatus::unhealthy(e.to_string())
            }
        }
    }

    async fn check_llm_endpoint(&self) -> ComponentStatus {
        let model = &self.settings.embedding_model;

        match self.embedder.embed(model, "health check").await {
            Ok(vector) => ComponentStatus::healthy(format!(
                "embedding model `{}` returned {} dimensions",
                model,
                vector.len()
            )),
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET_AGENT, error = %e, "LLM endpoint health check failed");
                ComponentStatus::unhealthy(e.to_string())
            }
        }
    }

    /// Answer `query_text` from the configured collection.
    ///
    /// Validation failures return before any network call. Provider failures
    /// abort at the failing stage; no partial result is returned.
    pub async fn query(&self, query_text: &str, options: &QueryOptions) -> Result<QueryResult> {
        let started = Instant::now();
        let request = self.validate(query_text, options)?;

        tracing::debug!(
            target: TRACING_TARGET_AGENT,
            query = %truncate_chars(request.query, 100),
            top_k = request.top_k,
            threshold = request.threshold,
            "processing query"
        );

        let embed_input = match request.selected_text {
            Some(selected) => format!("{} {}", selected, request.query),
            None => request.query.to_string(),
        };
        let vector = self
            .embedder
            .embed(&self.settings.embedding_model, &embed_input)
            .await
            .map_err(|e| e.at_stage(Stage::Embedding))?;

        let hits = self
            .searcher
            .search(&self.settings.collection_name, vector, request.top_k)
            .await
            .map_err(|e| e.at_stage(Stage::Retrieval))?;
        let candidates = hits.len();

        let passages = select_passages(
            hits.into_iter().map(RetrievedPassage::from_hit).collect(),
            request.threshold,
            request.top_k,
        );

        if passages.is_empty() {
            tracing::info!(
                target: TRACING_TARGET_AGENT,
                candidates,
                threshold = request.threshold,
                "no passage met the similarity threshold, answering without context"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_AGENT,
                candidates,
                kept = passages.len(),
                "filtered search results"
            );
        }

        let messages = prompt::build_messages(request.query, request.selected_text, &passages);
        let config = CompletionConfig {
            model: self.settings.chat_model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let completion = self
            .completer
            .complete(&messages, &config)
            .await
            .map_err(|e| e.at_stage(Stage::Generation))?;

        let answer = match completion.trim() {
            "" => FALLBACK_ANSWER.to_string(),
            text => text.to_string(),
        };

        let result = QueryResult {
            answer,
            citations: prompt::citations(&passages),
            confidence: prompt::confidence(&passages),
            processing_time_ms: started.elapsed().as_millis() as u64,
            model: config.model,
        };

        tracing::info!(
            target: TRACING_TARGET_AGENT,
            citations = result.citations.len(),
            confidence = result.confidence,
            elapsed_ms = result.processing_time_ms,
            "query answered"
        );

        Ok(result)
    }

    fn validate<'a>(&self, query_text: &'a str, options: &'a QueryOptions) -> Result<ValidatedQuery<'a>> {
        let query = query_text.trim();
        if query.is_empty() {
            return Err(Error::Validation("query must not be empty".to_string()));
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(Error::Validation(format!(
                "query exceeds the maximum length of {} characters",
                MAX_QUERY_CHARS
            )));
        }

        let top_k = options.top_k.unwrap_or(self.settings.default_top_k);
        if top_k == 0 {
            return Err(Error::Validation("top_k must be greater than zero".to_string()));
        }

        let threshold = options
            .similarity_threshold
            .unwrap_or(self.settings.default_similarity_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Validation(format!(
                "similarity_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }

        let selected_text = options
            .selected_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(selected) = selected_text {
            if selected.chars().count() > MAX_SELECTED_TEXT_CHARS {
                return Err(Error::Validation(format!(
                    "selected text exceeds the maximum length of {} characters",
                    MAX_SELECTED_TEXT_CHARS
                )));
            }
        }

        Ok(ValidatedQuery {
            query,
            selected_text,
            top_k,
            threshold,
        })
    }
}

/// Keep passages scoring at least `threshold`, best first, at most `top_k`
fn select_passages(mut passages: Vec<RetrievedPassage>, threshold: f32, top_k: usize) -> Vec<RetrievedPassage> {
    passages.retain(|p| p.score >= threshold);
    passages.sort_by(|a, b| b.score.total_cmp(&a.score));
    passages.truncate(top_k);
    passages
}
