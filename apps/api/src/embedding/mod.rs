//! Embedding client and the vector math used by few-shot selection.
//!
//! The service embeds exactly one incoming text per request, so only
//! single-input calls are supported.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
/// Embedding model matching the vectors precomputed in the example table.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS_BASE: u64 = 100;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Cannot embed empty input")]
    EmptyInput,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("API returned no embedding data")]
    NoData,
}

/// Computes an embedding vector for a single text.
///
/// Carried in the transformer as `Arc<dyn Embedder>` so tests can
/// substitute a deterministic implementation.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embeddings API client.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let request_body = EmbeddingRequest {
            input: text,
            model: EMBEDDING_MODEL,
        };

        let mut last_error: Option<EmbeddingError> = None;
        let mut delay_ms = RETRY_DELAY_MS_BASE;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }

            let response = self
                .client
                .post(OPENAI_EMBEDDINGS_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embeddings API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let embedding_response: EmbeddingResponse = response.json().await?;

            return embedding_response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or(EmbeddingError::NoData);
        }

        Err(last_error.unwrap_or(EmbeddingError::NoData))
    }
}

/// Cosine similarity between two equal-length vectors.
/// A zero vector yields 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.3, 0.4, 0.5];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero_not_nan() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_embedding_request_serializes_model_and_input() {
        let request = EmbeddingRequest {
            input: "some text",
            model: EMBEDDING_MODEL,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"], "some text");
        assert_eq!(json["model"], "text-embedding-3-small");
    }

    #[tokio::test]
    async fn test_embed_empty_input_rejected_locally() {
        let embedder = OpenAiEmbedder::new("test-key".to_string());
        let result = embedder.embed("   ").await;
        assert!(matches!(result, Err(EmbeddingError::EmptyInput)));
    }
}
