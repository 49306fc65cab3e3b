//! Embedding client for generating vector representations
//!
//! Talks to an Ollama-compatible embedding server. The knowledge base ships
//! with sentence-embedding models of the MiniLM family in mind, but any model
//! the server exposes works as long as one model is used consistently.

use std::time::Duration;

use assist_core::{AssistError, EmbeddingConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

// ============================================================================
// Embedding Trait
// ============================================================================

/// Trait for embedding generation
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;
}

// ============================================================================
// HTTP Embedding Client
// ============================================================================

/// Client for an Ollama-compatible embedding API
pub struct HttpEmbedding {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Known model dimensions; unknown models fall back to the MiniLM family.
fn dimension_for_model(model: &str) -> usize {
    match model {
        "all-minilm" => 384,
        "nomic-embed-text" => 768,
        "mxbai-embed-large" => 1024,
        _ => 384,
    }
}

impl HttpEmbedding {
    /// Create a new embedding client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimension = dimension_for_model(&model);

        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model,
            dimension,
        }
    }

    /// Create from config, with per-request and connect timeouts applied.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AssistError::EmbeddingError(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimension: dimension_for_model(&config.model),
        })
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::EmbeddingError(format!("Embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistError::EmbeddingError(format!(
                "Embedding server error: {error_text}"
            )));
        }

        let result: EmbeddingResponse = response.json().await.map_err(|e| {
            AssistError::EmbeddingError(format!("Failed to parse embedding response: {e}"))
        })?;

        if result.embedding.is_empty() {
            return Err(AssistError::EmbeddingError(
                "Embedding server returned an empty vector".to_string(),
            ));
        }

        Ok(result.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The API has no native batch endpoint, so embed sequentially
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_dimensions() {
        let client = HttpEmbedding::new("http://localhost:11434", "all-minilm");
        assert_eq!(client.dimension(), 384);

        let client = HttpEmbedding::new("http://localhost:11434", "nomic-embed-text");
        assert_eq!(client.dimension(), 768);

        let client = HttpEmbedding::new("http://localhost:11434", "mxbai-embed-large");
        assert_eq!(client.dimension(), 1024);
    }

    #[test]
    fn test_unknown_model_falls_back_to_minilm_dimension() {
        let client = HttpEmbedding::new("http://localhost:11434", "some-future-model");
        assert_eq!(client.dimension(), 384);
    }

    #[test]
    fn test_from_config_uses_configured_model() {
        let config = EmbeddingConfig::default();
        let client = HttpEmbedding::from_config(&config).unwrap();
        assert_eq!(client.dimension(), 384);
        assert_eq!(client.model, "all-minilm");
    }
}
