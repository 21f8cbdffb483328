//! Category browsing for the dashboard.

use axum::{
    extract::{Path, State},
    Json,
};

use vaani_core::{Category, QueryResult};

use crate::error::{api_error, not_found, ApiError};
use crate::state::AppState;

pub async fn explore(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<QueryResult>, ApiError> {
    let category = Category::from_str(&category)
        .ok_or_else(|| not_found(format!("Unknown category '{}'", category)))?;

    let result = state.assistant.explore(category).await.map_err(api_error)?;
    Ok(Json(result))
}
