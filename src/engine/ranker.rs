//! Ranking of candidates against one or more source titles.
//!
//! Both queries read a prebuilt [`SimilarityIndex`]; nothing is recomputed per
//! request. Ties keep corpus row order (stable sort, no secondary key).

use serde::Serialize;

use super::error::EngineError;
use super::SimilarityIndex;
use crate::models::TitleId;

/// A recommended title and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredTitle {
    pub id: TitleId,
    pub score: f64,
}

/// Ranks every other title by similarity to `source`.
///
/// Only the source's own row is dropped; another title with identical content
/// (score 1.0) is still a candidate.
pub fn rank_single(
    index: &SimilarityIndex,
    source: TitleId,
    limit: usize,
) -> Result<Vec<ScoredTitle>, EngineError> {
    let row = index
        .corpus
        .row_of(source)
        .ok_or(EngineError::NotFound(source))?;

    let candidates: Vec<(usize, f64)> = index
        .matrix
        .row(row)
        .iter()
        .copied()
        .enumerate()
        .filter(|(other, _)| *other != row)
        .collect();

    Ok(top(index, candidates, limit))
}

/// Ranks titles by their mean similarity across all resolvable sources.
///
/// Unknown source ids are ignored; if none resolve the result is empty.
/// Every resolved source is excluded from the candidates.
pub fn rank_group(index: &SimilarityIndex, sources: &[TitleId], limit: usize) -> Vec<ScoredTitle> {
    let mut rows: Vec<usize> = Vec::with_capacity(sources.len());
    for &id in sources {
        match index.corpus.row_of(id) {
            Some(row) if !rows.contains(&row) => rows.push(row),
            Some(_) => {}
            None => tracing::debug!(title_id = id, "Ignoring group source outside the corpus"),
        }
    }

    if rows.is_empty() {
        return Vec::new();
    }

    let size = index.matrix.size();
    let mut totals = vec![0.0; size];
    for &row in &rows {
        for (total, score) in totals.iter_mut().zip(index.matrix.row(row)) {
            *total += score;
        }
    }

    let count = rows.len() as f64;
    let candidates: Vec<(usize, f64)> = totals
        .into_iter()
        .enumerate()
        .filter(|(candidate, _)| !rows.contains(candidate))
        .map(|(candidate, total)| (candidate, total / count))
        .collect();

    top(index, candidates, limit)
}

fn top(index: &SimilarityIndex, mut candidates: Vec<(usize, f64)>, limit: usize) -> Vec<ScoredTitle> {
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates
        .into_iter()
        .take(limit)
        .map(|(row, score)| ScoredTitle {
            id: index.corpus.id_at(row),
            score,
        })
        .collect()
}
