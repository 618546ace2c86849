//! Corpus building: one text document per catalog title.

use std::collections::HashMap;

use crate::models::{TitleId, TitleRecord};

/// Minimum number of documents needed for a meaningful similarity matrix
pub const MIN_DOCUMENTS: usize = 2;

/// Ordered (id, document) rows. Row `k` is also row/column `k` of the
/// similarity matrix built from this corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    ids: Vec<TitleId>,
    documents: Vec<String>,
    rows: HashMap<TitleId, usize>,
}

/// Result of building a corpus from the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusBuild {
    Sufficient(Corpus),
    Insufficient { documents: usize },
}

impl Corpus {
    /// Builds a corpus from catalog records, preserving their iteration order.
    /// A repeated id keeps only its first record.
    pub fn build(records: &[TitleRecord]) -> CorpusBuild {
        let mut ids = Vec::with_capacity(records.len());
        let mut documents = Vec::with_capacity(records.len());
        let mut rows = HashMap::with_capacity(records.len());

        for record in records {
            if rows.contains_key(&record.id) {
                tracing::warn!(title_id = record.id, "Skipping duplicate title id in catalog");
                continue;
            }
            rows.insert(record.id, ids.len());
            ids.push(record.id);
            documents.push(document_for(record));
        }

        if ids.len() < MIN_DOCUMENTS {
            return CorpusBuild::Insufficient {
                documents: ids.len(),
            };
        }

        CorpusBuild::Sufficient(Self {
            ids,
            documents,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[TitleId] {
        &self.ids
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Row index of a title, if it is part of this corpus
    pub fn row_of(&self, id: TitleId) -> Option<usize> {
        self.rows.get(&id).copied()
    }

    pub fn id_at(&self, row: usize) -> TitleId {
        self.ids[row]
    }
}

/// Concatenates genres, description, cast and director, skipping absent fields
pub fn document_for(record: &TitleRecord) -> String {
    let listed_in = record.listed_in.as_deref().map(|g| g.replace(',', " "));
    let cast = record.cast.as_deref().map(|c| c.replace(',', " "));

    [
        listed_in.as_deref(),
        record.description.as_deref(),
        cast.as_deref(),
        record.director.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|field| !field.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
