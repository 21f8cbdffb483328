//! Health and statistics.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use vaani_core::QueryResult;

use crate::error::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub graph: bool,
    pub active_conversations: usize,
    pub uptime_secs: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let graph = state.assistant.store().ping().await;
    Json(Health {
        status: if graph { "ok" } else { "degraded" },
        graph,
        active_conversations: state.conversations().len(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<QueryResult>, ApiError> {
    let result = state.assistant.stats().await.map_err(api_error)?;
    Ok(Json(result))
}
