//! In-memory collaborators for agent tests

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bookrag_core::{
    ChatCompleter, ChatMessage, CollectionInfo, CompletionConfig, Embedder, Error, Result,
    SearchHit, VectorSearcher,
};

#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
    pub fail: Option<Error>,
}

impl FakeEmbedder {
    pub fn failing(err: Error) -> Self {
        Self {
            fail: Some(err),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(vec![0.25, 0.5, 0.75]),
        }
    }
}

#[derive(Default)]
pub struct FakeSearcher {
    pub hits: Vec<SearchHit>,
    pub calls: AtomicUsize,
    pub requested_top_k: Mutex<Option<usize>>,
    pub fail: Option<Error>,
}

impl FakeSearcher {
    /// Hits with the given scores, ids `doc-1`, `doc-2`, ...
    pub fn with_scores(scores: &[f32]) -> Self {
        let hits = scores
            .iter()
            .enumerate()
            .map(|(i, score)| SearchHit {
                id: format!("doc-{}", i + 1),
                score: *score,
                payload: json!({
                    "content": format!("Passage {} text.", i + 1),
                    "title": format!("Chapter {}", i + 1),
                    "url": format!("/book/chapter-{}", i + 1),
                }),
            })
            .collect();

        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn failing(err: Error) -> Self {
        Self {
            fail: Some(err),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorSearcher for FakeSearcher {
    async fn search(&self, _collection: &str, _vector: Vec<f32>, top_k: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.requested_top_k.lock().unwrap() = Some(top_k);
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(self.hits.iter().take(top_k).cloned().collect()),
        }
    }

    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(CollectionInfo {
                name: collection.to_string(),
                points_count: Some(self.hits.len() as u64),
            }),
        }
    }
}

pub struct FakeCompleter {
    pub reply: String,
    pub calls: AtomicUsize,
    pub last_messages: Mutex<Vec<ChatMessage>>,
    pub fail: Option<Error>,
}

impl FakeCompleter {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
            fail: None,
        }
    }

    pub fn failing(err: Error) -> Self {
        Self {
            fail: Some(err),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user_prompt(&self) -> String {
        self.last_messages
            .lock()
            .unwrap()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatCompleter for FakeCompleter {
    async fn complete(&self, messages: &[ChatMessage], _config: &CompletionConfig) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(self.reply.clone()),
        }
    }
}
