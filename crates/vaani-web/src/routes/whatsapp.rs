//! WhatsApp webhook: form-encoded message in, TwiML out.

use axum::{
    extract::{Form, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use vaani_core::conversation::normalize_sender;
use vaani_core::{render, Surface, MAX_INPUT_CHARS};

use crate::state::AppState;
use crate::twiml;

pub const BOT_NAME: &str = "Vaani";

/// Fields of the provider's inbound message form that we use.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "MessageSid", default)]
    pub message_sid: String,
}

pub async fn webhook(State(state): State<AppState>, Form(msg): Form<InboundMessage>) -> impl IntoResponse {
    let sender = normalize_sender(&msg.from);
    let body: String = msg.body.trim().chars().take(MAX_INPUT_CHARS).collect();
    info!(sender, message_sid = %msg.message_sid, chars = body.chars().count(), "WhatsApp message received");

    let context = (!sender.is_empty()).then_some(sender);
    let reply = match state.assistant.answer(&body, context).await {
        Ok(response) => render(&response, Surface::WhatsApp),
        Err(e) => {
            error!(sender, error = %e, "Failed to answer WhatsApp message");
            render(&vaani_core::Response::canned(e.user_message()), Surface::WhatsApp)
        }
    };

    ([(header::CONTENT_TYPE, "application/xml")], twiml::message(&reply))
}

#[derive(Debug, Serialize)]
pub struct BotStatus {
    pub status: &'static str,
    pub bot_name: &'static str,
    pub active_conversations: usize,
    pub timestamp: String,
}

pub async fn bot_status(State(state): State<AppState>) -> Json<BotStatus> {
    Json(BotStatus {
        status: "active",
        bot_name: BOT_NAME,
        active_conversations: state.conversations().len(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
