use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::messages::models::{
    CreateMessageRequest, Message, UpdateMessageRequest, MIN_TEXT_LEN,
};
use crate::state::AppState;

/// GET /api/messages
pub async fn handle_list_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    Json(state.messages.list().await)
}

/// GET /api/messages/:id
pub async fn handle_get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    state
        .messages
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("message with id {id} does not exist")))
}

/// POST /api/messages
///
/// Runs the full transform pipeline and stores the resulting record.
pub async fn handle_create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<Json<Message>, AppError> {
    if req.original_text.chars().count() < MIN_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "original_text must be at least {MIN_TEXT_LEN} characters"
        )));
    }

    let outcome = state.transformer.transform(&req.original_text).await?;

    let (splitted_text, communication_style): (Vec<_>, Vec<_>) = outcome
        .chunks
        .into_iter()
        .map(|c| (c.text, c.style))
        .unzip();

    let message = Message {
        id: Uuid::new_v4(),
        original_text: req.original_text,
        prompt: outcome.prompt,
        raw_output: outcome.raw_output,
        splitted_text,
        communication_style,
        transformed_text: outcome.transformed_text,
        total_tokens: outcome.total_tokens,
        created_at: Utc::now(),
    };

    state.messages.insert(message.clone()).await;
    Ok(Json(message))
}

/// PUT /api/messages/:id
pub async fn handle_update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<Json<Message>, AppError> {
    if let Some(original_text) = &req.original_text {
        if original_text.chars().count() < MIN_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "original_text must be at least {MIN_TEXT_LEN} characters"
            )));
        }
    }

    let updated = state.messages.update(id, req).await?;
    Ok(Json(updated))
}

/// DELETE /api/messages/:id
pub async fn handle_delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.messages.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "message with id {id} does not exist"
        )))
    }
}
