/// LLM Client — the single point of entry for all chat-completion calls in Dailogy.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI chat API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gpt-4o-mini (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all chat calls in Dailogy.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini";
/// Deterministic output — the rewrite must be reproducible for a given prompt.
pub const TEMPERATURE: f32 = 0.0;
const MAX_RETRIES: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Token accounting reported by the API for a single call.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The assistant's text plus token usage for one completed call.
#[derive(Debug, Clone)]
pub struct LlmReply {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Sends one system + user chat exchange.
///
/// Carried in the transformer as `Arc<dyn ChatClient>` so pipeline tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn call(&self, prompt: &str, system: &str) -> Result<LlmReply, LlmError>;
}

/// The single LLM client used by the transform pipeline.
/// Wraps the OpenAI chat completions API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl ChatClient for LlmClient {
    /// Makes a chat call with a system and a user message.
    /// Retries on 429 (rate limit) and 5xx errors with jittered exponential backoff.
    async fn call(&self, prompt: &str, system: &str) -> Result<LlmReply, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(OPENAI_CHAT_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                chat_response.usage.prompt_tokens, chat_response.usage.completion_tokens
            );

            return extract_reply(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Pulls the first choice's content out of a chat response.
fn extract_reply(response: ChatResponse) -> Result<LlmReply, LlmError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyContent)?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(LlmReply {
        text,
        usage: response.usage,
    })
}

/// Exponential backoff with jitter: base 1s doubled per attempt,
/// plus up to one full interval of random jitter.
fn backoff_delay(attempt: u32) -> std::time::Duration {
    let base = BACKOFF_BASE_MS * (1 << (attempt - 1));
    let jitter = rand::thread_rng().gen_range(0..=base);
    std::time::Duration::from_millis(base + jitter)
}
