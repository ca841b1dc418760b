pub mod health;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::messages::handlers;
use crate::state::AppState;

/// GET /
async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Dailogy API" }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health::health_handler))
        .route(
            "/api/messages",
            get(handlers::handle_list_messages).post(handlers::handle_create_message),
        )
        .route(
            "/api/messages/:id",
            get(handlers::handle_get_message)
                .put(handlers::handle_update_message)
                .delete(handlers::handle_delete_message),
        )
        .with_state(state)
}
