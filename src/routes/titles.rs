use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{NewTitle, TitleId, TitleResponse},
    routes::AppState,
    services::{
        ingestion::{self, ImportReport},
        title_search,
    },
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleResponse>>> {
    let titles =
        title_search::search_titles(state.catalog.as_ref(), &params.q, state.limits.search_limit)
            .await?;
    Ok(Json(titles.iter().map(TitleResponse::from).collect()))
}

/// Handler for fetching a single title
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<TitleId>,
) -> AppResult<Json<TitleResponse>> {
    let record = state
        .catalog
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))?;
    Ok(Json(TitleResponse::from(&record)))
}

/// Handler for batch title import
pub async fn import(
    State(state): State<AppState>,
    Json(titles): Json<Vec<NewTitle>>,
) -> AppResult<(StatusCode, Json<ImportReport>)> {
    let report = ingestion::import_titles(state.catalog.as_ref(), &state.engine, titles).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
