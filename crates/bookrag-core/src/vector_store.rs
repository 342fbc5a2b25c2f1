//! Vector search trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single similarity search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

/// Summary of a collection, used for health checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub points_count: Option<u64>,
}

/// Read-only access to a vector database (e.g., Qdrant)
///
/// Collection lifecycle and upserts are managed elsewhere; implementations
/// only query.
#[async_trait]
pub trait VectorSearcher: Send + Sync {
    /// Return up to `top_k` hits ordered by descending score
    async fn search(&self, collection: &str, vector: Vec<f32>, top_k: usize) -> Result<Vec<SearchHit>>;

    /// Fetch collection metadata
    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo>;
}
