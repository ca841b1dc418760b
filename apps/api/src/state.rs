use std::sync::Arc;

use crate::config::Config;
use crate::fewshot::ExampleStore;
use crate::messages::pipeline::Transformer;
use crate::messages::store::MessageStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub messages: MessageStore,
    /// The precomputed few-shot table, loaded once at startup.
    pub examples: Arc<ExampleStore>,
    /// Pluggable transform pipeline. Production: `LlmTransformer`;
    /// tests substitute a deterministic stub.
    pub transformer: Arc<dyn Transformer>,
}
