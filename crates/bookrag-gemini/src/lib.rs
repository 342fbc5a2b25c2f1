//! Gemini integration for bookrag
//!
//! This crate provides the connection/config provider and an
//! OpenAI-compatible client implementing the `Embedder` and `ChatCompleter`
//! traits.

mod client;
mod connection;


pub use client::GeminiClient;
pub use connection::{Connection, load_configuration};

// Re-export core types for convenience
pub use bookrag_core::{
    ChatCompleter, ChatMessage, CompletionConfig, Embedder, Error, Result, Settings,
};

/// Tracing target for this crate
pub const TRACING_TARGET: &str = "bookrag_gemini";
