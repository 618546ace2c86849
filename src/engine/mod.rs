//! Content-based recommendation engine.
//!
//! The engine turns the catalog into a TF-IDF similarity index once per
//! refresh and answers every query from that cached index. Each rebuild
//! produces a new immutable [`Generation`]; publishing it is a single `Arc`
//! swap, so a query always sees one complete generation.

pub mod corpus;
pub mod error;
pub mod ranker;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::models::{TitleId, TitleRecord};
use crate::services::catalog::CatalogStore;

pub use corpus::{Corpus, CorpusBuild};
pub use error::EngineError;
pub use ranker::ScoredTitle;
pub use similarity::SimilarityMatrix;
pub use vectorizer::TermVectors;

/// Corpus, term vectors and similarity matrix built from one catalog snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityIndex {
    pub corpus: Corpus,
    pub vectors: TermVectors,
    pub matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Runs the full build; the O(n²) matrix dominates the cost
    pub fn build(records: &[TitleRecord]) -> Result<Self, EngineError> {
        let corpus = match Corpus::build(records) {
            CorpusBuild::Sufficient(corpus) => corpus,
            CorpusBuild::Insufficient { documents } => {
                return Err(EngineError::InsufficientData { documents })
            }
        };
        let vectors = vectorizer::vectorize(&corpus)?;
        let matrix = SimilarityMatrix::build(&vectors);

        Ok(Self {
            corpus,
            vectors,
            matrix,
        })
    }
}

/// Outcome of one build
#[derive(Debug)]
pub enum IndexState {
    Ready(SimilarityIndex),
    /// Queries return empty results until the next refresh
    Degraded(EngineError),
}

/// One published build of the index
#[derive(Debug)]
pub struct Generation {
    pub number: u64,
    pub built_at: DateTime<Utc>,
    pub state: IndexState,
}

/// Diagnostic view of the published generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub generation: Option<u64>,
    pub built_at: Option<DateTime<Utc>>,
    pub ready: bool,
    pub titles: usize,
    pub vocabulary: usize,
    pub failure: Option<String>,
}

impl EngineStatus {
    fn not_loaded() -> Self {
        Self {
            generation: None,
            built_at: None,
            ready: false,
            titles: 0,
            vocabulary: 0,
            failure: None,
        }
    }
}

impl From<&Generation> for EngineStatus {
    fn from(generation: &Generation) -> Self {
        let (ready, titles, vocabulary, failure) = match &generation.state {
            IndexState::Ready(index) => (
                true,
                index.corpus.len(),
                index.vectors.vocabulary_size(),
                None,
            ),
            IndexState::Degraded(reason) => (false, 0, 0, Some(reason.to_string())),
        };
        Self {
            generation: Some(generation.number),
            built_at: Some(generation.built_at),
            ready,
            titles,
            vocabulary,
            failure,
        }
    }
}

/// Recommendation engine owning the cached similarity index
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogStore>,
    current: RwLock<Option<Arc<Generation>>>,
    rebuild: Mutex<()>,
    generations: AtomicU64,
}

impl RecommendationEngine {
    /// Creates an engine with nothing loaded; the first query or `refresh` builds the index
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog,
            current: RwLock::new(None),
            rebuild: Mutex::new(()),
            generations: AtomicU64::new(0),
        }
    }

    /// Rebuilds the index from the catalog and publishes it.
    ///
    /// Insufficient data or an empty vocabulary still publish a (degraded)
    /// generation and return `Ok`. A store failure or an aborted build keeps
    /// the previous generation and returns the error.
    pub async fn refresh(&self) -> Result<EngineStatus, EngineError> {
        let _guard = self.rebuild.lock().await;
        let generation = self.rebuild_locked().await?;
        Ok(EngineStatus::from(generation.as_ref()))
    }

    /// Drops the published generation; the next query rebuilds it
    pub async fn invalidate(&self) {
        let _guard = self.rebuild.lock().await;
        *self.current.write().await = None;
        tracing::info!("Recommendation index invalidated");
    }

    /// Describes the published generation without triggering a build
    pub async fn status(&self) -> EngineStatus {
        match self.current.read().await.as_ref() {
            Some(generation) => EngineStatus::from(generation.as_ref()),
            None => EngineStatus::not_loaded(),
        }
    }

    /// Top `limit` title ids most similar to `source`
    pub async fn recommend(
        &self,
        source: TitleId,
        limit: usize,
    ) -> Result<Vec<TitleId>, EngineError> {
        let ranked = self.recommend_scored(source, limit).await?;
        Ok(ranked.into_iter().map(|r| r.id).collect())
    }

    /// Same as [`recommend`](Self::recommend) with similarity scores attached
    pub async fn recommend_scored(
        &self,
        source: TitleId,
        limit: usize,
    ) -> Result<Vec<ScoredTitle>, EngineError> {
        let Some(generation) = self.snapshot().await else {
            return Ok(Vec::new());
        };

        match &generation.state {
            IndexState::Ready(index) => ranker::rank_single(index, source, limit),
            IndexState::Degraded(_) => Ok(Vec::new()),
        }
    }

    /// Top `limit` title ids by mean similarity to the group
    pub async fn recommend_group(&self, sources: &[TitleId], limit: usize) -> Vec<TitleId> {
        self.recommend_group_scored(sources, limit)
            .await
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    pub async fn recommend_group_scored(
        &self,
        sources: &[TitleId],
        limit: usize,
    ) -> Vec<ScoredTitle> {
        let Some(generation) = self.snapshot().await else {
            return Vec::new();
        };

        match &generation.state {
            IndexState::Ready(index) => ranker::rank_group(index, sources, limit),
            IndexState::Degraded(_) => Vec::new(),
        }
    }

    /// Published generation, building one first if none exists
    async fn snapshot(&self) -> Option<Arc<Generation>> {
        if let Some(generation) = self.current.read().await.clone() {
            return Some(generation);
        }

        let _guard = self.rebuild.lock().await;
        // Another query may have finished the build while we waited.
        if let Some(generation) = self.current.read().await.clone() {
            return Some(generation);
        }

        tracing::info!("Recommendation index not loaded, building on demand");
        match self.rebuild_locked().await {
            Ok(generation) => Some(generation),
            Err(e) => {
                tracing::error!(error = %e, "On-demand index build failed");
                None
            }
        }
    }

    /// Builds and publishes a generation. Caller must hold `self.rebuild`.
    async fn rebuild_locked(&self) -> Result<Arc<Generation>, EngineError> {
        let start = Instant::now();

        let records = self.catalog.all_records().await.map_err(|e| {
            tracing::error!(store = self.catalog.name(), error = %e, "Failed to read catalog");
            EngineError::Store(e.to_string())
        })?;
        let record_count = records.len();

        let state = tokio::task::spawn_blocking(move || match SimilarityIndex::build(&records) {
            Ok(index) => IndexState::Ready(index),
            Err(reason) => IndexState::Degraded(reason),
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Index build task failed, keeping previous generation");
            EngineError::BuildAborted(e.to_string())
        })?;

        let number = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &state {
            IndexState::Ready(index) => tracing::info!(
                generation = number,
                titles = index.corpus.len(),
                vocabulary = index.vectors.vocabulary_size(),
                elapsed_ms,
                "Recommendation index built"
            ),
            IndexState::Degraded(reason) => tracing::warn!(
                generation = number,
                records = record_count,
                reason = %reason,
                "Recommendation index degraded, queries will return no results"
            ),
        }

        let generation = Arc::new(Generation {
            number,
            built_at: Utc::now(),
            state,
        });
        *self.current.write().await = Some(Arc::clone(&generation));

        Ok(generation)
    }
}
