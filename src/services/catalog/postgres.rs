use async_trait::async_trait;
use sqlx::PgPool;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{NewTitle, TitleId, TitleRecord},
};

const COLUMNS: &str = "id, show_id, title, content_type, director, \"cast\", country, \
                       date_added, release_year, rating, duration, listed_in, description";

/// Catalog backed by the `titles` table
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so user input matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn all_records(&self) -> AppResult<Vec<TitleRecord>> {
        let records = sqlx::query_as::<_, TitleRecord>(&format!(
            "SELECT {} FROM titles ORDER BY id",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = records.len(), "Loaded catalog records");
        Ok(records)
    }

    async fn find_by_id(&self, id: TitleId) -> AppResult<Option<TitleRecord>> {
        let record = sqlx::query_as::<_, TitleRecord>(&format!(
            "SELECT {} FROM titles WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_by_title_substring(
        &self,
        text: &str,
        limit: usize,
    ) -> AppResult<Vec<TitleRecord>> {
        let records = sqlx::query_as::<_, TitleRecord>(&format!(
            "SELECT {} FROM titles WHERE title ILIKE $1 ESCAPE '\\' ORDER BY id LIMIT $2",
            COLUMNS
        ))
        .bind(like_pattern(text))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn find_by_ids(&self, ids: &[TitleId]) -> AppResult<Vec<TitleRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, TitleRecord>(&format!(
            "SELECT {} FROM titles WHERE id = ANY($1)",
            COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn insert(&self, title: NewTitle) -> AppResult<Option<TitleRecord>> {
        let record = sqlx::query_as::<_, TitleRecord>(&format!(
            "INSERT INTO titles (show_id, title, content_type, director, \"cast\", country, \
             date_added, release_year, rating, duration, listed_in, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (show_id) DO NOTHING \
             RETURNING {}",
            COLUMNS
        ))
        .bind(&title.show_id)
        .bind(&title.title)
        .bind(&title.content_type)
        .bind(&title.director)
        .bind(&title.cast)
        .bind(&title.country)
        .bind(&title.date_added)
        .bind(title.release_year)
        .bind(&title.rating)
        .bind(&title.duration)
        .bind(&title.listed_in)
        .bind(&title.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn count(&self) -> AppResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM titles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_text() {
        assert_eq!(like_pattern("matrix"), "%matrix%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
