//! Qdrant-backed vector searcher

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::{PointId, SearchPointsBuilder, Value};
use std::time::Duration;

use bookrag_core::{CollectionInfo, Error, Result, SearchHit, Settings, VectorSearcher};

use crate::TRACING_TARGET_QDRANT;

/// Read-only searcher over a Qdrant deployment
pub struct QdrantSearcher {
    client: Qdrant,
    url: String,
}

impl QdrantSearcher {
    /// Build a client; no request is sent until the first search
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .timeout(timeout)
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::Configuration(format!("invalid Qdrant client settings: {}", e)))?;

        tracing::debug!(target: TRACING_TARGET_QDRANT, %url, "Qdrant client configured");

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.qdrant_url,
            &settings.qdrant_api_key,
            settings.request_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VectorSearcher for QdrantSearcher {
    async fn search(&self, collection: &str, vector: Vec<f32>, top_k: usize) -> Result<Vec<SearchHit>> {
        let request = SearchPointsBuilder::new(collection, vector, top_k as u64)
            .with_payload(SelectorOptions::Enable(true));

        let response = self.client.search_points(request).await.map_err(|e| {
            Error::Retrieval(format!("search in collection `{}` failed: {}", collection, e))
        })?;

        let hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .map(|point| SearchHit {
                id: point_id_to_string(point.id),
                score: point.score,
                payload: payload_to_json(point.payload),
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET_QDRANT,
            collection = %collection,
            hits = hits.len(),
            "Qdrant search completed"
        );

        Ok(hits)
    }

    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo> {
        let response = self.client.collection_info(collection).await.map_err(|e| {
            Error::Retrieval(format!("collection `{}` is unavailable: {}", collection, e))
        })?;

        Ok(CollectionInfo {
            name: collection.to_string(),
            points_count: response.result.and_then(|info| info.points_count),
        })
    }
}

/// Numeric and UUID point ids both become strings
fn point_id_to_string(id: Option<PointId>) -> String {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(s)) => s,
        None => String::new(),
    }
}

fn payload_to_json(payload: std::collections::HashMap<String, Value>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = payload
        .into_iter()
        .map(|(k, v)| (k, qdrant_value_to_json(v)))
        .collect();
    serde_json::Value::Object(map)
}

fn qdrant_value_to_json(value: Value) -> serde_json::Value {
    match value.kind {
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::json!(i),
        Some(Kind::DoubleValue(f)) => serde_json::json!(f),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qdrant_value_to_json).collect())
        }
        Some(Kind::StructValue(obj)) => {
            let map: serde_json::Map<String, serde_json::Value> = obj
                .fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_value_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}
