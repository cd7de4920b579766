//! Field extraction from saved article pages.
//!
//! A document is parsed once; every extractor reads the same tree. Each
//! field is a cascade of sources composed with `Option::or_else`, so a
//! missing or malformed source simply falls through to the next one:
//!
//! | Field | Module | Sources in priority order |
//! |-------|--------|---------------------------|
//! | title | [`title`] | `<title>` (cleaned), first `<h1>` |
//! | canonical URL | [`canonical`] | `<link rel="canonical">` |
//! | publication date | [`date`] | JSON-LD, `article:published_time`, `<time>` |
//! | categories | [`categories`] | `article:tag` meta, `/tag/` anchors |
//! | content | [`sanitize`] | first `<article>`, sanitized |
//!
//! [`assemble`] then applies the acceptance rule and produces an
//! [`ArticleRecord`].

pub mod canonical;
pub mod categories;
pub mod date;
pub mod sanitize;
pub mod title;

use crate::config::SyncConfig;
use crate::errors::{Rejection, Result};
use crate::models::ArticleRecord;
use crate::utils::slugify;
use date::PublishedDate;
use sanitize::Sanitizer;
use scraper::Html;
use title::TitleCleaner;
use tracing::{debug, instrument};

/// Everything the extractors found in one document, before acceptance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub canonical_url: Option<String>,
    pub published: PublishedDate,
    pub categories: Vec<String>,
    pub content_html: Option<String>,
}

/// Runs every field extractor against a document.
///
/// Holds the patterns that depend on the configured author and site names,
/// compiled once per batch.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    titles: TitleCleaner,
    sanitizer: Sanitizer,
}

impl ArticleExtractor {
    pub fn new(author_name: &str, site_name: &str) -> Result<Self> {
        Ok(ArticleExtractor {
            titles: TitleCleaner::new(site_name, author_name)?,
            sanitizer: Sanitizer::new(author_name)?,
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(&config.author_name, &config.site_name)
    }

    #[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
    pub fn extract(&self, html: &str) -> ExtractedFields {
        let document = Html::parse_document(html);
        let fields = ExtractedFields {
            title: title::extract_title(&document, &self.titles),
            canonical_url: canonical::extract_canonical_url(&document),
            published: date::extract_published_date(&document),
            categories: categories::extract_categories(&document),
            content_html: self.sanitizer.sanitize(&document),
        };
        debug!(
            title = ?fields.title,
            has_canonical = fields.canonical_url.is_some(),
            date = ?fields.published.display,
            categories = fields.categories.len(),
            content_bytes = fields.content_html.as_ref().map_or(0, String::len),
            "Extracted fields"
        );
        fields
    }

    /// Extract and assemble in one step.
    pub fn extract_record(&self, html: &str) -> std::result::Result<ArticleRecord, Rejection> {
        assemble(self.extract(html))
    }
}

/// Build a record from extracted fields.
///
/// A record needs a non-empty title and a non-empty slug derived from it;
/// everything else is optional.
pub fn assemble(fields: ExtractedFields) -> std::result::Result<ArticleRecord, Rejection> {
    let title = fields
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(Rejection::MissingTitle)?;
    let slug = slugify(&title);
    if slug.is_empty() {
        return Err(Rejection::EmptySlug { title });
    }

    Ok(ArticleRecord {
        title,
        slug,
        url: fields.canonical_url.clone(),
        canonical_url: fields.canonical_url,
        published_at: fields.published.iso,
        display_date: fields.published.display,
        categories: fields.categories,
        content_html: fields.content_html,
    })
}
