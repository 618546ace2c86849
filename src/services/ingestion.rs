use serde::Serialize;

use crate::{
    engine::{EngineStatus, RecommendationEngine},
    error::{AppError, AppResult},
    models::NewTitle,
    services::catalog::CatalogStore,
};

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
    /// Engine status after the post-import refresh, if one ran
    pub engine: Option<EngineStatus>,
}

/// Imports titles into the catalog and refreshes the engine if anything changed
///
/// Rows whose `show_id` already exists are skipped. Rows without a `show_id`
/// or title are rejected before anything is written.
pub async fn import_titles(
    catalog: &dyn CatalogStore,
    engine: &RecommendationEngine,
    titles: Vec<NewTitle>,
) -> AppResult<ImportReport> {
    let titles: Vec<NewTitle> = titles.into_iter().map(NewTitle::normalized).collect();

    if let Some(position) = titles
        .iter()
        .position(|t| t.show_id.is_empty() || t.title.is_empty())
    {
        return Err(AppError::InvalidInput(format!(
            "Title at position {} is missing show_id or title",
            position
        )));
    }

    tracing::info!(count = titles.len(), "Importing titles");

    let mut inserted = 0;
    let mut skipped = 0;
    for title in titles {
        let show_id = title.show_id.clone();
        match catalog.insert(title).await {
            Ok(Some(_)) => {
                inserted += 1;
                if inserted % 100 == 0 {
                    tracing::info!(inserted, "Import progress");
                }
            }
            Ok(None) => skipped += 1,
            Err(e) => {
                tracing::error!(
                    show_id = %show_id,
                    inserted,
                    skipped,
                    error = %e,
                    "Import aborted"
                );
                // Rows written before the failure stay in the catalog.
                if inserted > 0 {
                    if let Err(refresh_err) = engine.refresh().await {
                        tracing::error!(error = %refresh_err, "Refresh after partial import failed");
                    }
                }
                return Err(e);
            }
        }
    }

    tracing::info!(inserted, skipped, "Import finished");

    let engine = if inserted > 0 {
        Some(engine.refresh().await?)
    } else {
        None
    };

    Ok(ImportReport {
        inserted,
        skipped,
        engine,
    })
}
