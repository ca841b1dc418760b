//! Transform pipeline — classify the text, select few-shot examples by
//! embedding similarity, rewrite into functional language.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::fewshot::ExampleStore;
use crate::llm_client::prompts::{CLASSIFIER_SYSTEM, REWRITER_SYSTEM};
use crate::llm_client::ChatClient;
use crate::messages::chunks::{parse_chunks_or_fallback, render_chunks, Chunk};
use crate::messages::prompts::{build_rewrite_prompt, build_split_classify_prompt};

/// Everything the pipeline produced for one submitted text.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The final rewrite prompt sent to the LLM.
    pub prompt: String,
    /// Raw classifier output before parsing.
    pub raw_output: String,
    pub chunks: Vec<Chunk>,
    pub transformed_text: String,
    pub total_tokens: u32,
}

/// The transform pipeline behind the create-message endpoint.
///
/// Carried in `AppState` as `Arc<dyn Transformer>` so handler tests can
/// substitute a deterministic implementation.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, original_text: &str) -> Result<TransformOutcome, AppError>;
}

/// Production transformer: two chat calls plus one embedding call.
pub struct LlmTransformer {
    llm: Arc<dyn ChatClient>,
    embedder: Arc<dyn Embedder>,
    examples: Arc<ExampleStore>,
    num_examples: usize,
}

impl LlmTransformer {
    pub fn new(
        llm: Arc<dyn ChatClient>,
        embedder: Arc<dyn Embedder>,
        examples: Arc<ExampleStore>,
        num_examples: usize,
    ) -> Self {
        Self {
            llm,
            embedder,
            examples,
            num_examples,
        }
    }
}

#[async_trait]
impl Transformer for LlmTransformer {
    async fn transform(&self, original_text: &str) -> Result<TransformOutcome, AppError> {
        // Call 1: split the text into chunks and classify each one.
        let classify_prompt = build_split_classify_prompt(original_text);
        let classified = self.llm.call(&classify_prompt, CLASSIFIER_SYSTEM).await?;

        let chunks = parse_chunks_or_fallback(&classified.text, original_text);
        debug!("Classified text into {} chunk(s)", chunks.len());

        // Nearest-neighbor scan over the precomputed example table.
        let query = self.embedder.embed(original_text).await?;
        let selected = self.examples.select(&query, self.num_examples)?;
        for scored in &selected {
            debug!(
                similarity = scored.similarity,
                "Selected few-shot example: {}", scored.example.original
            );
        }

        // Call 2: rewrite the classified chunks with the examples spliced in.
        let rendered = render_chunks(&chunks);
        let prompt = build_rewrite_prompt(&rendered, &selected);
        let reply = self.llm.call(&prompt, REWRITER_SYSTEM).await?;

        Ok(TransformOutcome {
            prompt,
            raw_output: classified.text,
            chunks,
            transformed_text: reply.text.trim().to_string(),
            total_tokens: classified.usage.total_tokens + reply.usage.total_tokens,
        })
    }
}
