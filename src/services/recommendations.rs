use std::collections::HashMap;

use serde::Serialize;

use crate::{
    engine::{RecommendationEngine, ScoredTitle},
    error::{AppError, AppResult},
    models::{TitleId, TitleRecord, TitleResponse, TitleSummary},
    services::{catalog::CatalogStore, title_search::resolve_title},
};

/// A recommended title with its similarity to the query
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedTitle {
    #[serde(flatten)]
    pub title: TitleResponse,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleRecommendations {
    pub source_title: TitleResponse,
    pub recommendations: Vec<RecommendedTitle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRecommendations {
    pub source_titles: Vec<TitleSummary>,
    pub unmatched: Vec<String>,
    pub recommendations: Vec<RecommendedTitle>,
}

/// Recommendations for the first title whose name contains `title`
pub async fn recommend_for_title(
    catalog: &dyn CatalogStore,
    engine: &RecommendationEngine,
    title: &str,
    limit: usize,
) -> AppResult<TitleRecommendations> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Title parameter is required".to_string(),
        ));
    }

    let source = resolve_title(catalog, title)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title \"{}\" not found", title.trim())))?;

    recommend_for_record(catalog, engine, source, limit).await
}

/// Recommendations for a title looked up by id
pub async fn recommend_for_id(
    catalog: &dyn CatalogStore,
    engine: &RecommendationEngine,
    id: TitleId,
    limit: usize,
) -> AppResult<TitleRecommendations> {
    let source = catalog
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))?;

    recommend_for_record(catalog, engine, source, limit).await
}

async fn recommend_for_record(
    catalog: &dyn CatalogStore,
    engine: &RecommendationEngine,
    source: TitleRecord,
    limit: usize,
) -> AppResult<TitleRecommendations> {
    let ranked = engine.recommend_scored(source.id, limit).await?;

    tracing::info!(
        title_id = source.id,
        limit,
        returned = ranked.len(),
        "Computed title recommendations"
    );

    Ok(TitleRecommendations {
        source_title: TitleResponse::from(&source),
        recommendations: resolve_ranked(catalog, &ranked).await?,
    })
}

/// Recommendations for a group, one source per entered title
///
/// Blank titles and titles that match nothing are reported back in
/// `unmatched`; if none match the request fails with `NotFound`.
pub async fn recommend_for_group(
    catalog: &dyn CatalogStore,
    engine: &RecommendationEngine,
    titles: &[String],
    limit: usize,
) -> AppResult<GroupRecommendations> {
    if titles.is_empty() {
        return Err(AppError::InvalidInput(
            "titles must be a non-empty array".to_string(),
        ));
    }

    let mut sources: Vec<TitleSummary> = Vec::new();
    let mut unmatched = Vec::new();
    for title in titles {
        if title.trim().is_empty() {
            unmatched.push(title.clone());
            continue;
        }
        match resolve_title(catalog, title).await? {
            Some(record) if sources.iter().any(|s| s.id == record.id) => {}
            Some(record) => sources.push(TitleSummary::from(&record)),
            None => unmatched.push(title.clone()),
        }
    }

    if sources.is_empty() {
        return Err(AppError::NotFound(
            "No titles found for the provided names".to_string(),
        ));
    }

    let ids: Vec<TitleId> = sources.iter().map(|s| s.id).collect();
    let ranked = engine.recommend_group_scored(&ids, limit).await;

    tracing::info!(
        sources = ids.len(),
        unmatched = unmatched.len(),
        returned = ranked.len(),
        "Computed group recommendations"
    );

    Ok(GroupRecommendations {
        source_titles: sources,
        unmatched,
        recommendations: resolve_ranked(catalog, &ranked).await?,
    })
}

/// Fetches records for ranked ids, keeping rank order
async fn resolve_ranked(
    catalog: &dyn CatalogStore,
    ranked: &[ScoredTitle],
) -> AppResult<Vec<RecommendedTitle>> {
    let ids: Vec<TitleId> = ranked.iter().map(|r| r.id).collect();
    let records: HashMap<TitleId, TitleRecord> = catalog
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    Ok(ranked
        .iter()
        .filter_map(|r| {
            records.get(&r.id).map(|record| RecommendedTitle {
                title: TitleResponse::from(record),
                similarity: r.score,
            })
        })
        .collect())
}
