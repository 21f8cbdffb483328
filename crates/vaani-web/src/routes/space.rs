//! Snapshot data polled by the 3D view.

use axum::{extract::State, Json};

use vaani_space::{CatalogSatellite, IssPosition, CATALOG};

use crate::state::AppState;

pub async fn iss(State(state): State<AppState>) -> Json<IssPosition> {
    Json(state.iss.snapshot().await)
}

pub async fn satellites() -> Json<&'static [CatalogSatellite]> {
    Json(CATALOG)
}
