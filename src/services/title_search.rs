use crate::{
    error::{AppError, AppResult},
    models::TitleRecord,
    services::catalog::CatalogStore,
};

/// Service function for title search
///
/// Delegates to the configured CatalogStore, maintaining a clean separation
/// between HTTP routing and business logic.
pub async fn search_titles(
    catalog: &dyn CatalogStore,
    query: &str,
    limit: usize,
) -> AppResult<Vec<TitleRecord>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter q is required".to_string(),
        ));
    }

    catalog.find_by_title_substring(query, limit).await
}

/// Resolves user-entered text to the first matching title
pub async fn resolve_title(
    catalog: &dyn CatalogStore,
    text: &str,
) -> AppResult<Option<TitleRecord>> {
    let matches = catalog.find_by_title_substring(text.trim(), 1).await?;
    Ok(matches.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogStore;

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let catalog = MockCatalogStore::new();
        let err = search_titles(&catalog, "   ", 10).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_query_is_trimmed_and_limited() {
        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_find_by_title_substring()
            .withf(|text, limit| text == "matrix" && *limit == 10)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let found = search_titles(&catalog, "  matrix ", 10).await.unwrap();
        assert!(found.is_empty());
    }
}
