//! All-pairs cosine similarity over a corpus's term vectors.

use rayon::prelude::*;

use super::vectorizer::TermVectors;

/// Dense all-pairs cosine similarity matrix, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes every pairwise score.
    ///
    /// Only the upper triangle is computed (rows in parallel) and then mirrored,
    /// so `get(i, j) == get(j, i)` holds bit for bit. The diagonal is exactly
    /// 1.0 for documents with at least one vocabulary term and 0.0 otherwise.
    pub fn build(vectors: &TermVectors) -> Self {
        let size = vectors.len();
        let upper: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|i| {
                let row = vectors.get(i);
                ((i + 1)..size)
                    .map(|j| row.cosine(vectors.get(j)))
                    .collect()
            })
            .collect();

        let mut scores = vec![0.0; size * size];
        for (i, row) in upper.into_iter().enumerate() {
            scores[i * size + i] = if vectors.get(i).is_zero() { 0.0 } else { 1.0 };
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                scores[i * size + j] = score;
                scores[j * size + i] = score;
            }
        }

        Self { size, scores }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.size + j]
    }

    /// Scores of row `i` against every row of the corpus
    pub fn row(&self, i: usize) -> &[f64] {
        &self.scores[i * self.size..(i + 1) * self.size]
    }
}
