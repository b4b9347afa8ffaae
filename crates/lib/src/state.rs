//! Per-conversation state (dialog stack only).
//!
//! Keyed by conversation id. Loaded at the start of a message turn and saved after it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One running dialog and the index of its next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogInstance {
    pub id: String,
    pub step: usize,
}

/// State kept for a conversation between turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    #[serde(default)]
    pub dialog_stack: Vec<DialogInstance>,
}

impl ConversationState {
    pub fn is_empty(&self) -> bool {
        self.dialog_stack.is_empty()
    }

    pub fn active_dialog(&self) -> Option<&DialogInstance> {
        self.dialog_stack.last()
    }
}

/// In-memory conversation state store.
pub struct ConversationStateStore {
    inner: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl Default for ConversationStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// State for the conversation, or a fresh empty one.
    pub async fn load(&self, conversation_id: &str) -> ConversationState {
        self.inner
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the stored state. An empty state removes the entry.
    pub async fn save(&self, conversation_id: &str, state: ConversationState) {
        let mut g = self.inner.write().await;
        if state.is_empty() {
            g.remove(conversation_id);
        } else {
            g.insert(conversation_id.to_string(), state);
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
