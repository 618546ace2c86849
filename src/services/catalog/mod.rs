pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{NewTitle, TitleId, TitleRecord},
};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Durable owner of title records
///
/// The recommendation engine only reads from the store; inserts come from the
/// import endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every record, in a stable order
    async fn all_records(&self) -> AppResult<Vec<TitleRecord>>;

    async fn find_by_id(&self, id: TitleId) -> AppResult<Option<TitleRecord>>;

    /// Case-insensitive title substring match, ordered by id
    async fn find_by_title_substring(&self, text: &str, limit: usize)
        -> AppResult<Vec<TitleRecord>>;

    /// Bulk lookup; the result order is unspecified and unknown ids are skipped
    async fn find_by_ids(&self, ids: &[TitleId]) -> AppResult<Vec<TitleRecord>>;

    /// Inserts a title, returning `None` if its `show_id` already exists
    async fn insert(&self, title: NewTitle) -> AppResult<Option<TitleRecord>>;

    async fn count(&self) -> AppResult<usize>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
