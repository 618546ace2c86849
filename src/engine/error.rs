use crate::models::TitleId;

/// Failures the recommendation engine can report
///
/// Only `NotFound` is returned from queries. The load failures are kept as
/// the state of a degraded generation, and `Store` / `BuildAborted` are
/// returned from an explicit refresh.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("title {0} is not in the loaded corpus")]
    NotFound(TitleId),

    #[error("insufficient data: {documents} document(s), at least 2 are required")]
    InsufficientData { documents: usize },

    #[error("vectorization produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("catalog store unavailable: {0}")]
    Store(String),

    #[error("similarity build aborted: {0}")]
    BuildAborted(String),
}
