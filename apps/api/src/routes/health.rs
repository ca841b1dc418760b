use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and how many few-shot examples are loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "dailogy-api",
        "version": env!("CARGO_PKG_VERSION"),
        "examples_loaded": state.examples.len(),
    }))
}
