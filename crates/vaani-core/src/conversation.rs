//! Per-sender conversation memory.
//!
//! One [`ConversationContext`] per sender, kept in a [`DashMap`] so concurrent
//! requests for different senders never contend. Entries expire after an
//! inactivity window and the map is capped; [`ConversationStore::sweep`] is
//! run periodically by the server.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{EntityMention, Intent};

/// Expiry and capacity limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Seconds of inactivity after which a context is forgotten.
    pub inactivity_secs: i64,
    pub max_conversations: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self { inactivity_secs: 1800, max_conversations: 100 }
    }
}

/// What the assistant remembers about one sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationContext {
    pub last_intent: Intent,
    /// Entities of the most recent turn that named any.
    pub last_entities: Vec<EntityMention>,
    pub timestamp: DateTime<Utc>,
    pub interaction_count: u32,
    pub last_query: String,
}

impl ConversationContext {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            last_intent: Intent::Unknown,
            last_entities: Vec::new(),
            timestamp: now,
            interaction_count: 0,
            last_query: String::new(),
        }
    }
}

/// Strip the messaging provider's channel prefix from a sender id.
pub fn normalize_sender(sender: &str) -> &str {
    let trimmed = sender.trim();
    trimmed.strip_prefix("whatsapp:").unwrap_or(trimmed).trim()
}

/// Concurrent map of sender id to context.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    entries: Arc<DashMap<String, ConversationContext>>,
    config: ConversationConfig,
}

impl ConversationStore {
    pub fn new(config: ConversationConfig) -> Self {
        Self { entries: Arc::new(DashMap::new()), config }
    }

    pub fn config(&self) -> ConversationConfig {
        self.config
    }

    fn expired(&self, ctx: &ConversationContext, now: DateTime<Utc>) -> bool {
        now - ctx.timestamp > Duration::seconds(self.config.inactivity_secs)
    }

    /// Live context for a sender, if any.
    pub fn get(&self, sender: &str) -> Option<ConversationContext> {
        self.get_at(sender, Utc::now())
    }

    pub fn get_at(&self, sender: &str, now: DateTime<Utc>) -> Option<ConversationContext> {
        self.entries
            .get(sender)
            .filter(|ctx| !self.expired(ctx, now))
            .map(|ctx| ctx.value().clone())
    }

    /// Record a turn that went through the pipeline.
    ///
    /// Entities replace the remembered ones only when the turn named some,
    /// so a chain of follow-ups keeps pointing at the same subject.
    pub fn record(&self, sender: &str, intent: Intent, entities: &[EntityMention], query: &str) {
        self.record_at(sender, intent, entities, query, Utc::now());
    }

    pub fn record_at(
        &self,
        sender: &str,
        intent: Intent,
        entities: &[EntityMention],
        query: &str,
        now: DateTime<Utc>,
    ) {
        self.update(sender, now, |ctx| {
            ctx.last_intent = intent;
            if !entities.is_empty() {
                ctx.last_entities = entities.to_vec();
            }
            ctx.last_query = query.to_string();
        });
    }

    /// Count an interaction (small talk) without changing the subject.
    pub fn touch(&self, sender: &str, query: &str) {
        self.touch_at(sender, query, Utc::now());
    }

    pub fn touch_at(&self, sender: &str, query: &str, now: DateTime<Utc>) {
        self.update(sender, now, |ctx| ctx.last_query = query.to_string());
    }

    fn update(&self, sender: &str, now: DateTime<Utc>, apply: impl FnOnce(&mut ConversationContext)) {
        let mut entry = self
            .entries
            .entry(sender.to_string())
            .or_insert_with(|| ConversationContext::fresh(now));
        if self.expired(&entry, now) {
            *entry = ConversationContext::fresh(now);
        }
        apply(&mut entry);
        entry.timestamp = now;
        entry.interaction_count += 1;
    }

    /// Interactions so far in the sender's live conversation.
    pub fn interaction_count(&self, sender: &str) -> u32 {
        self.get(sender).map_or(0, |ctx| ctx.interaction_count)
    }

    /// Drop expired contexts, then the oldest ones beyond capacity.
    /// Returns how many entries were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, ctx| !self.expired(ctx, now));

        let overflow = self.entries.len().saturating_sub(self.config.max_conversations);
        if overflow > 0 {
            let mut by_age: Vec<(String, DateTime<Utc>)> = self
                .entries
                .iter()
                .map(|e| (e.key().clone(), e.value().timestamp))
                .collect();
            by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            for (sender, _) in by_age.into_iter().take(overflow) {
                self.entries.remove(&sender);
            }
        }

        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Swept conversation contexts");
        }
        removed
    }

    /// Number of stored contexts, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
