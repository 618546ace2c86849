//! TF-IDF term weighting over a corpus.
//!
//! Documents are lowercased and split into word tokens of at least two
//! characters; English stop words are dropped. The vocabulary is every
//! remaining term in the corpus, with columns assigned in sorted term order so
//! an unchanged catalog always produces identical vectors.
//!
//! A term's weight in a document is its raw count times the smoothed inverse
//! document frequency `ln((1 + n) / (1 + df)) + 1`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::corpus::Corpus;
use super::error::EngineError;
use super::stop_words::is_stop_word;

/// Sparse weighted vector for one document
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector {
    /// (column, weight) pairs sorted by column
    entries: Vec<(usize, f64)>,
    norm: f64,
}

impl TermVector {
    fn new(entries: Vec<(usize, f64)>) -> Self {
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        Self { entries, norm }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Euclidean magnitude
    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }

    /// Sparse dot product; both sides are sorted by column
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_col, a_w) = self.entries[i];
            let (b_col, b_w) = other.entries[j];
            match a_col.cmp(&b_col) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity in [0, 1]; zero when either vector is empty
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        (self.dot(other) / (self.norm * other.norm)).clamp(0.0, 1.0)
    }
}

/// Term vectors for every row of a corpus, plus the vocabulary they index
#[derive(Debug, Clone, PartialEq)]
pub struct TermVectors {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<TermVector>,
}

impl TermVectors {
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, column: usize) -> f64 {
        self.idf[column]
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    pub fn get(&self, row: usize) -> &TermVector {
        &self.vectors[row]
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Splits a document into lowercase non-stop-word terms
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Builds TF-IDF vectors for every document in the corpus
pub fn vectorize(corpus: &Corpus) -> Result<TermVectors, EngineError> {
    let tokenized: Vec<Vec<String>> = corpus.documents().iter().map(|d| tokenize(d)).collect();

    let terms: BTreeSet<&str> = tokenized
        .iter()
        .flat_map(|tokens| tokens.iter().map(String::as_str))
        .collect();

    if terms.is_empty() {
        return Err(EngineError::EmptyVocabulary);
    }

    let vocabulary: BTreeMap<String, usize> = terms
        .into_iter()
        .enumerate()
        .map(|(column, term)| (term.to_string(), column))
        .collect();

    let counts: Vec<HashMap<usize, u32>> = tokenized
        .iter()
        .map(|tokens| {
            let mut tf: HashMap<usize, u32> = HashMap::new();
            for token in tokens {
                if let Some(&column) = vocabulary.get(token) {
                    *tf.entry(column).or_default() += 1;
                }
            }
            tf
        })
        .collect();

    let mut document_frequency = vec![0u32; vocabulary.len()];
    for tf in &counts {
        for &column in tf.keys() {
            document_frequency[column] += 1;
        }
    }

    let n = corpus.len() as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let vectors = counts
        .into_iter()
        .map(|tf| {
            let mut entries: Vec<(usize, f64)> = tf
                .into_iter()
                .map(|(column, count)| (column, count as f64 * idf[column]))
                .collect();
            entries.sort_unstable_by_key(|(column, _)| *column);
            TermVector::new(entries)
        })
        .collect();

    Ok(TermVectors {
        vocabulary,
        idf,
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::corpus::CorpusBuild;
    use crate::models::NewTitle;

    fn corpus(documents: &[&str]) -> Corpus {
        let records: Vec<_> = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let mut title = NewTitle::new(format!("s{}", i), format!("Title {}", i));
                title.description = Some(doc.to_string());
                title.into_record(i as i64 + 1)
            })
            .collect();
        match Corpus::build(&records) {
            CorpusBuild::Sufficient(corpus) => corpus,
            CorpusBuild::Insufficient { .. } => panic!("test corpus too small"),
        }
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("The Crew of a Space Station, in 2049: x");
        assert_eq!(tokens, vec!["crew", "space", "station", "2049"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectors = vectorize(&corpus(&["zebra apple", "mango apple"])).unwrap();
        assert_eq!(vectors.vocabulary_size(), 3);
        assert_eq!(vectors.column_of("apple"), Some(0));
        assert_eq!(vectors.column_of("mango"), Some(1));
        assert_eq!(vectors.column_of("zebra"), Some(2));
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let vectors = vectorize(&corpus(&[
            "heist thriller",
            "heist comedy",
            "heist drama",
        ]))
        .unwrap();

        let heist = vectors.column_of("heist").unwrap();
        let thriller = vectors.column_of("thriller").unwrap();
        assert!((vectors.idf(heist) - 1.0).abs() < 1e-12);
        assert!(vectors.idf(thriller) > vectors.idf(heist));
    }

    #[test]
    fn test_term_count_scales_weight() {
        let vectors = vectorize(&corpus(&["ghost ghost house", "ghost town"])).unwrap();
        let ghost = vectors.column_of("ghost").unwrap();
        let weight = vectors
            .get(0)
            .entries()
            .iter()
            .find(|(col, _)| *col == ghost)
            .map(|(_, w)| *w)
            .unwrap();
        assert!((weight - 2.0 * vectors.idf(ghost)).abs() < 1e-12);
    }

    #[test]
    fn test_stop_word_only_corpus_has_empty_vocabulary() {
        let result = vectorize(&corpus(&["the and of", "a an the"]));
        assert_eq!(result, Err(EngineError::EmptyVocabulary));
    }

    #[test]
    fn test_cosine_bounds() {
        let vectors = vectorize(&corpus(&[
            "action adventure space",
            "action adventure space",
            "romance drama",
            "",
        ]))
        .unwrap();

        assert!((vectors.get(0).cosine(vectors.get(1)) - 1.0).abs() < 1e-12);
        assert_eq!(vectors.get(0).cosine(vectors.get(2)), 0.0);
        assert_eq!(vectors.get(0).cosine(vectors.get(3)), 0.0);
        assert!(vectors.get(3).is_zero());
    }
}
