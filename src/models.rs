//! Data models for extracted articles and their index entries.
//!
//! - [`ArticleRecord`]: one accepted article, built once per input document
//! - [`IndexEntry`]: the slice of a record written to the consolidated index
//!
//! Field names serialize in camelCase to match what the site's Svelte code
//! reads.

use serde::{Deserialize, Serialize};

/// A fully extracted article ready for rendering.
///
/// Records are only constructed by [`crate::extractors::assemble`], which
/// guarantees `title` and `slug` are non-empty and that `slug` was derived
/// from `title`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Human-readable headline.
    pub title: String,
    /// URL-safe identifier derived from `title`; primary key for output paths.
    pub slug: String,
    /// The document's canonical URL.
    pub url: Option<String>,
    /// Same value as `url`, kept under its own name for the page metadata.
    pub canonical_url: Option<String>,
    /// Raw ISO-8601 publication timestamp, when one could be parsed.
    pub published_at: Option<String>,
    /// `Month DD, YYYY`, or the raw visible `<time>` text when nothing parsed.
    pub display_date: Option<String>,
    /// Category tags in document order.
    pub categories: Vec<String>,
    /// Sanitized `<article>` markup.
    pub content_html: Option<String>,
}

impl ArticleRecord {
    /// The link shown as "originally published on", falling back to `url`.
    pub fn medium_url(&self) -> &str {
        self.canonical_url
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or_default()
    }
}

/// One row of the consolidated `articles.json` index.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndexEntry {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub categories: Vec<String>,
    pub url: String,
}

impl From<&ArticleRecord> for IndexEntry {
    fn from(record: &ArticleRecord) -> Self {
        IndexEntry {
            slug: record.slug.clone(),
            title: record.title.clone(),
            date: record.display_date.clone().unwrap_or_default(),
            categories: record.categories.clone(),
            url: record.url.clone().unwrap_or_default(),
        }
    }
}
