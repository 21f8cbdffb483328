//! JSON question answering endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use vaani_core::Response;

use crate::error::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    #[serde(default)]
    pub context_id: Option<String>,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<Response>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, chars = req.text.chars().count(), "Query received");

    let response = state
        .assistant
        .answer(&req.text, req.context_id.as_deref())
        .await
        .map_err(api_error)?;

    info!(%request_id, confidence = response.confidence, "Query answered");
    Ok(Json(response))
}
