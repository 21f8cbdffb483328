//! Application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use vaani_core::{Assistant, ConversationStore, GraphStore};
use vaani_space::IssTracker;

use crate::config::{AppConfig, ServerConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    pub iss: Arc<IssTracker>,
    pub server: Arc<ServerConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>, config: &AppConfig) -> Self {
        let conversations = ConversationStore::new(config.conversation);
        Self {
            assistant: Assistant::new(store, conversations),
            iss: Arc::new(IssTracker::new(&config.space)),
            server: Arc::new(config.server.clone()),
            started_at: Utc::now(),
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        self.assistant.conversations()
    }
}
