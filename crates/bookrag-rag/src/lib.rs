//! Retrieval-augmented generation for bookrag
//!
//! This crate provides the RAG agent that answers questions from a book
//! collection, the prompt builder it uses, and the Qdrant-backed searcher.

mod agent;
mod prompt;
mod qdrant;

#[cfg(test)]
mod fakes;

pub use agent::{LLM_ENDPOINT, MAX_QUERY_CHARS, MAX_SELECTED_TEXT_CHARS, RagAgent, VECTOR_DATABASE};
pub use prompt::{FALLBACK_ANSWER, NO_CONTEXT, SYSTEM_PROMPT, build_messages, citations, confidence};
pub use qdrant::QdrantSearcher;

// Re-export core types for convenience
pub use bookrag_core::{
    Citation, HealthReport, QueryOptions, QueryResult, RetrievedPassage, Settings, Error, Result,
};

/// Tracing target for query orchestration
pub const TRACING_TARGET_AGENT: &str = "bookrag_rag::agent";

/// Tracing target for Qdrant operations
pub const TRACING_TARGET_QDRANT: &str = "bookrag_rag::qdrant";
