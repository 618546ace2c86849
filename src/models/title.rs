use serde::{Deserialize, Serialize};

/// Primary key of a title in the catalog store
pub type TitleId = i64;

/// Represents a movie or TV show stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct TitleRecord {
    pub id: TitleId,
    /// External key from the source dataset (e.g. "s1")
    pub show_id: String,
    pub title: String,
    /// "Movie" or "TV Show"
    pub content_type: Option<String>,
    pub director: Option<String>,
    /// Comma-separated cast list
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    /// Comma-separated genre list
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

impl TitleRecord {
    /// Genre names split out of `listed_in`
    pub fn genres(&self) -> Vec<String> {
        split_list(self.listed_in.as_deref())
    }
}

/// A title to import into the catalog, before it has an id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTitle {
    pub show_id: String,
    pub title: String,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub listed_in: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTitle {
    /// Creates an import row with only the required fields set
    pub fn new(show_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            show_id: show_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Blank optional fields become `None`, required fields are trimmed
    pub fn normalized(self) -> Self {
        Self {
            show_id: self.show_id.trim().to_string(),
            title: self.title.trim().to_string(),
            content_type: non_blank(self.content_type),
            director: non_blank(self.director),
            cast: non_blank(self.cast),
            country: non_blank(self.country),
            date_added: non_blank(self.date_added),
            release_year: self.release_year,
            rating: non_blank(self.rating),
            duration: non_blank(self.duration),
            listed_in: non_blank(self.listed_in),
            description: non_blank(self.description),
        }
    }

    /// Attaches a store-assigned id
    pub fn into_record(self, id: TitleId) -> TitleRecord {
        TitleRecord {
            id,
            show_id: self.show_id,
            title: self.title,
            content_type: self.content_type,
            director: self.director,
            cast: self.cast,
            country: self.country,
            date_added: self.date_added,
            release_year: self.release_year,
            rating: self.rating,
            duration: self.duration,
            listed_in: self.listed_in,
            description: self.description,
        }
    }
}

/// Title as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleResponse {
    pub id: TitleId,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
}

impl From<&TitleRecord> for TitleResponse {
    fn from(record: &TitleRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            content_type: record.content_type.clone(),
            director: record.director.clone(),
            cast: record.cast.clone(),
            country: record.country.clone(),
            release_year: record.release_year,
            rating: record.rating.clone(),
            duration: record.duration.clone(),
            genres: record.genres(),
            description: record.description.clone(),
        }
    }
}

/// Minimal title reference used when echoing resolved inputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleSummary {
    pub id: TitleId,
    pub title: String,
}

impl From<&TitleRecord> for TitleSummary {
    fn from(record: &TitleRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
