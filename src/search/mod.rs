//! Search module - retrieval over indexed documents / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - Only exposes primitives: add_document, search
//! - Embedding and nearest-neighbor lookup are collaborators behind traits
//!   (`Embedder`, `VectorIndex`) so either can be swapped / 通过 trait 解耦
//! - Independent of the record store / 与记录存储互不依赖

pub mod embedder;
pub mod index;
pub mod tokenizer;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::SearchConfig;

pub use embedder::{build_embedder, ApiEmbedder, Embedder, HashEmbedder};
pub use index::{IndexHit, MemoryIndex, VectorIndex};

/// Search failure / 搜索错误
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid search configuration: {0}")]
    Config(String),
}

/// Search results as parallel arrays, closest first / 搜索结果（按距离升序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<String>,
    pub ids: Vec<String>,
    pub distances: Vec<f32>,
}

impl From<Vec<IndexHit>> for SearchResponse {
    fn from(hits: Vec<IndexHit>) -> Self {
        let mut response = SearchResponse::default();
        for hit in hits {
            response.documents.push(hit.text);
            response.ids.push(hit.id);
            response.distances.push(hit.distance);
        }
        response
    }
}

/// Retrieval engine / 检索引擎
pub struct RagEngine {
    collection: String,
    embedder: Arc<dyn Embedder>,
    index: RwLock<Box<dyn VectorIndex>>,
}

impl RagEngine {
    pub fn new(collection: &str, embedder: Arc<dyn Embedder>, index: Box<dyn VectorIndex>) -> Self {
        Self {
            collection: collection.to_string(),
            embedder,
            index: RwLock::new(index),
        }
    }

    /// Engine with the configured embedder and an in-memory index / 按配置创建
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let embedder = build_embedder(config)?;
        let index = MemoryIndex::new(embedder.dimension());
        tracing::info!(
            "RAG engine ready: collection={}, embedder={}, dimension={}",
            config.collection,
            embedder.name(),
            embedder.dimension()
        );
        Ok(Self::new(&config.collection, embedder, Box::new(index)))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document_count(&self) -> usize {
        self.index.read().len()
    }

    /// Embed and index one document; an existing id is replaced / 索引单个文档
    pub async fn add_document(&self, doc_id: &str, text: &str) -> Result<(), SearchError> {
        let vector = self.embedder.embed(text).await?;
        self.index
            .write()
            .upsert(doc_id.to_string(), text.to_string(), vector)?;
        tracing::info!("[{}] Document indexed: {}", self.collection, doc_id);
        Ok(())
    }

    /// The `n_results` documents closest to `query` / 检索最相近的文档
    pub async fn search(&self, query: &str, n_results: usize) -> Result<SearchResponse, SearchError> {
        let vector = self.embedder.embed(query).await?;
        let hits = self.index.read().query(&vector, n_results)?;
        tracing::debug!("[{}] Search returned {} hits", self.collection, hits.len());
        Ok(SearchResponse::from(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, SearchError> {
            Err(SearchError::Embedding("model unavailable".to_string()))
        }

        fn dimension(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn test_engine() -> RagEngine {
        RagEngine::from_config(&SearchConfig {
            dimension: 128,
            ..SearchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let engine = test_engine();
        engine
            .add_document("eco", "programme économique et croissance")
            .await
            .unwrap();
        engine
            .add_document("sport", "résultats du championnat de football")
            .await
            .unwrap();
        engine
            .add_document("edu", "réforme de l'éducation nationale")
            .await
            .unwrap();

        let results = engine.search("croissance économique", 2).await.unwrap();
        assert_eq!(results.ids.len(), 2);
        assert_eq!(results.documents.len(), 2);
        assert_eq!(results.distances.len(), 2);
        assert_eq!(results.ids[0], "eco");
        assert_eq!(results.documents[0], "programme économique et croissance");
        assert!(results.distances[0] <= results.distances[1]);
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let engine = test_engine();
        let results = engine.search("anything", 3).await.unwrap();
        assert_eq!(results, SearchResponse::default());
    }

    #[tokio::test]
    async fn test_readding_replaces_document() {
        let engine = test_engine();
        engine.add_document("doc", "first version").await.unwrap();
        engine.add_document("doc", "second version").await.unwrap();

        assert_eq!(engine.document_count(), 1);
        let results = engine.search("second version", 5).await.unwrap();
        assert_eq!(results.documents, vec!["second version".to_string()]);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let engine = RagEngine::new("docs", Arc::new(FailingEmbedder), Box::new(MemoryIndex::new(4)));
        assert!(engine.add_document("a", "text").await.is_err());
        assert!(engine.search("text", 3).await.is_err());
        assert_eq!(engine.document_count(), 0);
    }
}
