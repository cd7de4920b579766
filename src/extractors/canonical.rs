//! Canonical URL extraction from `<link rel="canonical">`.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CANONICAL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel~='canonical'][href]").expect("valid canonical selector"));

/// The `href` of the first `<link rel="canonical">`, verbatim.
pub fn extract_canonical_url(document: &Html) -> Option<String> {
    document
        .select(&CANONICAL)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| !href.trim().is_empty())
        .map(str::to_string)
}
