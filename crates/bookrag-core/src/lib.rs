//! Core traits and types for bookrag
//!
//! This crate defines the settings, error taxonomy and capability-facing
//! interfaces (embedding, vector search, chat completion) shared by the
//! provider crates and the RAG agent, keeping the agent testable against
//! in-memory fakes.

pub mod config;
pub mod error;
pub mod llm;
pub mod types;
pub mod vector_store;

pub use config::Settings;
pub use error::{Error, Result, Stage};
pub use llm::{ChatCompleter, ChatMessage, CompletionConfig, Embedder, Role};
pub use vector_store::{CollectionInfo, SearchHit, VectorSearcher};
pub use types::*;
