use axum::{extract::State, Json};

use crate::{engine::EngineStatus, error::AppResult, routes::AppState};

/// Rebuilds the recommendation index from the current catalog
pub async fn refresh(State(state): State<AppState>) -> AppResult<Json<EngineStatus>> {
    let status = state.engine.refresh().await?;
    Ok(Json(status))
}

/// Reports the currently published index generation
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status().await)
}
