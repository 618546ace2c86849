use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::TitleId,
    routes::AppState,
    services::recommendations::{self, GroupRecommendations, TitleRecommendations},
};

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    pub titles: Vec<String>,
    pub limit: Option<usize>,
}

/// Handler for recommendations by title name
pub async fn by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<TitleRecommendations>> {
    let limit = state.limits.resolve(params.limit)?;

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        limit,
        "Processing recommendation request"
    );

    let response = recommendations::recommend_for_title(
        state.catalog.as_ref(),
        &state.engine,
        &params.title,
        limit,
    )
    .await?;
    Ok(Json(response))
}

/// Handler for recommendations by title id
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<TitleId>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<TitleRecommendations>> {
    let limit = state.limits.resolve(params.limit)?;
    let response =
        recommendations::recommend_for_id(state.catalog.as_ref(), &state.engine, id, limit)
            .await?;
    Ok(Json(response))
}

/// Handler for group recommendations
pub async fn group(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GroupRequest>,
) -> AppResult<Json<GroupRecommendations>> {
    let limit = state.limits.resolve(request.limit)?;

    tracing::info!(
        request_id = %request_id,
        title_count = request.titles.len(),
        limit,
        "Processing group recommendation request"
    );

    let response = recommendations::recommend_for_group(
        state.catalog.as_ref(),
        &state.engine,
        &request.titles,
        limit,
    )
    .await?;
    Ok(Json(response))
}
