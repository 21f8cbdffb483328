//! The request pipeline: validate, extract, resolve context, translate,
//! query, format.

use std::sync::Arc;

use tracing::{debug, info};

use crate::conversation::{normalize_sender, ConversationStore};
use crate::error::{VaaniError, VaaniResult};
use crate::extract::extract;
use crate::format::{format_response, help_text, Response};
use crate::model::{Category, Intent};
use crate::result::QueryResult;
use crate::smalltalk;
use crate::store::{execute_with_retry, GraphStore};
use crate::translate::{explore_query, overview_query, translate, Plan};

/// Longest accepted question, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

const UNRESOLVED_FOLLOW_UP: &str = "🤔 I'm not sure what you're referring to. \
Could you name the mission, satellite or rocket? For example: \"When was Chandrayaan-3 launched?\"";

/// Answers questions against a graph store, remembering context per sender.
#[derive(Clone)]
pub struct Assistant {
    store: Arc<dyn GraphStore>,
    conversations: ConversationStore,
}

impl Assistant {
    pub fn new(store: Arc<dyn GraphStore>, conversations: ConversationStore) -> Self {
        Self { store, conversations }
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Answer one question. `context_id` identifies the sender whose
    /// conversation context is read and updated; without it every question
    /// stands alone.
    pub async fn answer(&self, text: &str, context_id: Option<&str>) -> VaaniResult<Response> {
        let text = validate(text)?;
        let sender = context_id.map(normalize_sender).filter(|s| !s.is_empty());

        let mut extraction = extract(text);

        if extraction.entities.is_empty() {
            // Small talk only when nothing in the message is a question.
            let chatter = extraction.intent == Intent::Unknown && extraction.subject.is_none();
            if let Some(kind) = smalltalk::detect(text).filter(|_| chatter) {
                let count = sender.map_or(0, |s| self.conversations.interaction_count(s)) + 1;
                if let Some(s) = sender {
                    self.conversations.touch(s, text);
                }
                debug!(kind = ?kind, "Small talk");
                return Ok(Response::canned(smalltalk::reply(kind, count)));
            }

            // "when was it launched?" leans on the previous turn's subject. A bare
            // attribute ("status?") does too, unless the message names its own category.
            if extraction.follow_up || (extraction.attribute.is_some() && extraction.subject.is_none()) {
                let remembered = sender
                    .and_then(|s| self.conversations.get(s))
                    .map(|ctx| ctx.last_entities)
                    .filter(|entities| !entities.is_empty());
                if let Some(entities) = remembered {
                    debug!(
                        resolved = %entities[0].canonical_name,
                        "Resolved follow-up from conversation context"
                    );
                    extraction = extraction.with_entities(entities);
                }
            }

            if extraction.entities.is_empty() && extraction.follow_up && extraction.subject.is_none() {
                if let Some(s) = sender {
                    self.conversations.touch(s, text);
                }
                return Ok(Response::canned(UNRESOLVED_FOLLOW_UP));
            }
        }

        let plan = match translate(&extraction) {
            Plan::Canned => {
                info!(intent = %Intent::Unknown, "No intent recognized, sending help");
                if let Some(s) = sender {
                    self.conversations.record(s, Intent::Unknown, &[], text);
                }
                return Ok(Response::canned(help_text()));
            }
            Plan::Query(plan) => plan,
        };

        let rows = execute_with_retry(self.store.as_ref(), &plan.query).await?;
        let result = QueryResult::decode(plan.query.shape(), &rows);
        let response = format_response(&plan, &result);

        info!(
            sender = sender.unwrap_or("-"),
            intent = %plan.intent,
            template = %plan.query.template,
            rows = rows.len(),
            result = result.kind(),
            "Answered question"
        );

        if let Some(s) = sender {
            self.conversations.record(s, plan.intent, &extraction.entities, text);
        }

        Ok(response)
    }

    /// Newest entries of one category.
    pub async fn explore(&self, category: Category) -> VaaniResult<QueryResult> {
        let query = explore_query(category);
        let rows = execute_with_retry(self.store.as_ref(), &query).await?;
        Ok(QueryResult::decode(query.shape(), &rows))
    }

    /// Node counts per category.
    pub async fn stats(&self) -> VaaniResult<QueryResult> {
        let query = overview_query();
        let rows = execute_with_retry(self.store.as_ref(), &query).await?;
        Ok(QueryResult::decode(query.shape(), &rows))
    }
}

/// Reject empty and oversized input before any processing.
fn validate(text: &str) -> VaaniResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VaaniError::malformed("empty message"));
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(VaaniError::malformed(format!("longer than {} characters", MAX_INPUT_CHARS)));
    }
    Ok(text)
}
