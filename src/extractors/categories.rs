//! Category extraction.
//!
//! `article:tag` meta entries are authoritative. Only when a document has
//! none do `/tag/` anchor links get consulted, and then only the first few,
//! since saved pages also link to tag listings from recommendation blocks.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TAG_META: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='article:tag'][content]").expect("valid article:tag selector")
});
static TAG_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/tag/']").expect("valid tag link selector"));

const MAX_TAG_LINKS: usize = 5;
/// Anchor text at or above this many characters is not a tag.
const MAX_TAG_CHARS: usize = 50;

pub fn extract_categories(document: &Html) -> Vec<String> {
    let from_meta = meta_tags(document);
    if !from_meta.is_empty() {
        return from_meta;
    }
    tag_links(document)
}

fn meta_tags(document: &Html) -> Vec<String> {
    document
        .select(&TAG_META)
        .filter_map(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect()
}

fn tag_links(document: &Html) -> Vec<String> {
    document
        .select(&TAG_LINK)
        .take(MAX_TAG_LINKS)
        .map(|link| link.text().collect::<String>().trim().to_lowercase())
        .filter(|text| !text.is_empty() && text.chars().count() < MAX_TAG_CHARS)
        .collect()
}
