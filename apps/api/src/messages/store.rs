//! In-memory message store. Records live for the lifetime of the process;
//! there is deliberately no persistence layer.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::messages::models::{Message, UpdateMessageRequest};

/// Shared handle to the message list. Cloning is cheap; all clones see
/// the same records.
#[derive(Clone, Default)]
pub struct MessageStore {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all messages in insertion order.
    pub async fn list(&self) -> Vec<Message> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Message> {
        self.inner.read().await.iter().find(|m| m.id == id).cloned()
    }

    pub async fn insert(&self, message: Message) {
        self.inner.write().await.push(message);
    }

    /// Applies a partial update. The chunk/style length invariant is checked
    /// against the patched record before committing; a violation leaves the
    /// stored message untouched.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateMessageRequest,
    ) -> Result<Message, AppError> {
        let mut messages = self.inner.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound(format!("message with id {id} does not exist")))?;

        let mut updated = message.clone();
        if let Some(original_text) = patch.original_text {
            updated.original_text = original_text;
        }
        if let Some(prompt) = patch.prompt {
            updated.prompt = prompt;
        }
        if let Some(raw_output) = patch.raw_output {
            updated.raw_output = raw_output;
        }
        if let Some(splitted_text) = patch.splitted_text {
            updated.splitted_text = splitted_text;
        }
        if let Some(communication_style) = patch.communication_style {
            updated.communication_style = communication_style;
        }
        if let Some(transformed_text) = patch.transformed_text {
            updated.transformed_text = transformed_text;
        }

        if updated.splitted_text.len() != updated.communication_style.len() {
            return Err(AppError::Validation(
                "splitted_text and communication_style must have the same length".to_string(),
            ));
        }

        *message = updated.clone();
        Ok(updated)
    }

    /// Removes a message. Returns `false` if no record had the given id.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut messages = self.inner.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        messages.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::models::CommunicationStyle;
    use chrono::Utc;

    fn make_message(original_text: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            original_text: original_text.to_string(),
            prompt: String::new(),
            raw_output: String::new(),
            splitted_text: vec![original_text.to_string()],
            communication_style: vec![CommunicationStyle::Neutral],
            transformed_text: String::new(),
            total_tokens: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_preserves_order() {
        let store = MessageStore::new();
        store.insert(make_message("first message")).await;
        store.insert(make_message("second message")).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].original_text, "first message");
        assert_eq!(listed[1].original_text, "second message");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = MessageStore::new();
        let message = make_message("findable message");
        let id = message.id;
        store.insert(message).await;

        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let store = MessageStore::new();
        let message = make_message("message to update");
        let id = message.id;
        store.insert(message).await;

        let patch = UpdateMessageRequest {
            transformed_text: Some("a calmer version".to_string()),
            ..Default::default()
        };
        let updated = store.update(id, patch).await.unwrap();

        assert_eq!(updated.original_text, "message to update");
        assert_eq!(updated.transformed_text, "a calmer version");
        assert_eq!(store.get(id).await.unwrap().transformed_text, "a calmer version");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MessageStore::new();
        let result = store.update(Uuid::new_v4(), UpdateMessageRequest::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_chunk_lengths() {
        let store = MessageStore::new();
        let message = make_message("message with chunks");
        let id = message.id;
        store.insert(message).await;

        let patch = UpdateMessageRequest {
            splitted_text: Some(vec!["one".to_string(), "two".to_string()]),
            // communication_style stays at length 1
            ..Default::default()
        };
        let result = store.update(id, patch).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        // The stored record is unchanged.
        assert_eq!(store.get(id).await.unwrap().splitted_text.len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MessageStore::new();
        let message = make_message("message to delete");
        let id = message.id;
        store.insert(message).await;

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.list().await.is_empty());
    }
}
