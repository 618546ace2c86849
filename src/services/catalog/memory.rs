use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{NewTitle, TitleId, TitleRecord},
};

/// Catalog held in process memory, used in tests and local runs without Postgres
#[derive(Default)]
pub struct InMemoryCatalogStore {
    records: RwLock<Vec<TitleRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new(records: Vec<TitleRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn all_records(&self) -> AppResult<Vec<TitleRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: TitleId) -> AppResult<Option<TitleRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_title_substring(
        &self,
        text: &str,
        limit: usize,
    ) -> AppResult<Vec<TitleRecord>> {
        let needle = text.to_lowercase();
        let records = self.records.read().await;
        let mut matches: Vec<TitleRecord> = records
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.id);
        matches.truncate(limit);
        Ok(matches)
    }

    async fn find_by_ids(&self, ids: &[TitleId]) -> AppResult<Vec<TitleRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, title: NewTitle) -> AppResult<Option<TitleRecord>> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.show_id == title.show_id) {
            return Ok(None);
        }

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = title.into_record(id);
        records.push(record.clone());
        Ok(Some(record))
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.records.read().await.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
