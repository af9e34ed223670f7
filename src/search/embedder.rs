//! Embedding providers / 向量化提供者
//!
//! - `HashEmbedder`: FNV-1a feature hashing, deterministic, offline / 本地特征哈希
//! - `ApiEmbedder`: OpenAI-compatible `/embeddings` endpoint / 兼容 OpenAI 的接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::tokenizer::{generate_ngrams, tokenize};
use super::SearchError;
use crate::config::{EmbeddingProviderKind, SearchConfig};

/// Turns text into a fixed-length vector / 将文本转换为定长向量
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError>;

    /// Length of every vector this embedder produces / 向量维度
    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Build the embedder selected in the config / 根据配置创建向量化提供者
pub fn build_embedder(config: &SearchConfig) -> Result<Arc<dyn Embedder>, SearchError> {
    if config.dimension == 0 {
        return Err(SearchError::Config("embedding dimension must be positive".to_string()));
    }
    match config.provider {
        EmbeddingProviderKind::Hash => Ok(Arc::new(HashEmbedder::new(config.dimension))),
        EmbeddingProviderKind::Api => Ok(Arc::new(ApiEmbedder::new(config)?)),
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Feature hashing embedder / 特征哈希向量化
///
/// Words and their character trigrams are hashed into signed buckets and
/// the result is L2-normalized, so texts sharing vocabulary land close
/// together. No model, no network.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    const WORD_WEIGHT: f32 = 1.0;
    const NGRAM_WEIGHT: f32 = 0.5;

    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in tokenize(text) {
            self.add_feature(&mut vector, &word, Self::WORD_WEIGHT);
            for ngram in generate_ngrams(&word, 3) {
                self.add_feature(&mut vector, &format!("#{}", ngram), Self::NGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// OpenAI-compatible embedding client / 兼容 OpenAI 的向量化客户端
pub struct ApiEmbedder {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl std::fmt::Debug for ApiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEmbedder")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        if config.api_base.trim().is_empty() {
            return Err(SearchError::Config("api_base cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError> {
        let url = format!("{}/embeddings", self.api_base);
        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            input: vec![text],
            model: &self.model,
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Embedding(format!(
                "embedding API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| SearchError::Embedding("embedding API returned no data".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
