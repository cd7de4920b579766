//! Title extraction.
//!
//! Cascade: `<title>` text with the site suffix and author byline stripped,
//! then the first `<h1>`. Either source yielding only whitespace counts as
//! unavailable.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid h1 selector"));

/// Strips export noise from `<title>` text.
///
/// Saved Medium pages title themselves `Headline | by Author | Medium` or
/// `Headline | Medium`, and some headlines end with the author's own
/// `. By Author` attribution.
#[derive(Debug, Clone)]
pub struct TitleCleaner {
    author_site_suffix: Regex,
    site_suffix: Regex,
    author_byline: Regex,
}

impl TitleCleaner {
    pub fn new(site_name: &str, author_name: &str) -> Result<Self, regex::Error> {
        let site = regex::escape(site_name);
        let author = regex::escape(author_name);
        Ok(TitleCleaner {
            author_site_suffix: Regex::new(&format!(r"\s*\|\s*(?i:by)\s+.*?\s*\|\s*{site}\s*$"))?,
            site_suffix: Regex::new(&format!(r"\s*\|\s*{site}\s*$"))?,
            author_byline: Regex::new(&format!(r"(?i)\.?\s*by\s+{author}\s*$"))?,
        })
    }

    pub fn clean(&self, raw: &str) -> String {
        let title = self.author_site_suffix.replace(raw, "");
        let title = self.site_suffix.replace(&title, "");
        let title = self.author_byline.replace(&title, "");
        title.trim().to_string()
    }
}

pub fn extract_title(document: &Html, cleaner: &TitleCleaner) -> Option<String> {
    from_title_element(document, cleaner).or_else(|| from_first_heading(document))
}

fn from_title_element(document: &Html, cleaner: &TitleCleaner) -> Option<String> {
    let element = document.select(&TITLE).next()?;
    let raw = element.text().collect::<String>();
    non_empty(cleaner.clean(&raw))
}

fn from_first_heading(document: &Html) -> Option<String> {
    let element = document.select(&H1).next()?;
    non_empty(element.text().collect::<String>().trim().to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> TitleCleaner {
        TitleCleaner::new("Medium", "Kai Maurin-Jones").unwrap()
    }

    #[test]
    fn test_strips_author_and_site_suffix() {
        assert_eq!(cleaner().clean("My Title | by Jane Doe | Medium"), "My Title");
        assert_eq!(cleaner().clean("My Title | BY Jane Doe | Medium  "), "My Title");
    }

    #[test]
    fn test_strips_site_suffix() {
        assert_eq!(cleaner().clean("My Title | Medium"), "My Title");
    }

    #[test]
    fn test_strips_trailing_author_byline() {
        assert_eq!(cleaner().clean("My Title. By Kai Maurin-Jones"), "My Title");
        assert_eq!(cleaner().clean("My Title by kai maurin-jones"), "My Title");
    }

    #[test]
    fn test_keeps_inner_pipes_and_other_authors() {
        assert_eq!(cleaner().clean("A | B | by Jane | Medium"), "A | B");
        assert_eq!(
            cleaner().clean("Written by Someone Else"),
            "Written by Someone Else"
        );
    }

    #[test]
    fn test_site_name_is_configurable() {
        let cleaner = TitleCleaner::new("Substack", "Jane Doe").unwrap();
        assert_eq!(cleaner.clean("Essay | by Jane Doe | Substack"), "Essay");
        assert_eq!(cleaner.clean("Essay | Medium"), "Essay | Medium");
    }

    #[test]
    fn test_title_element_wins_over_h1() {
        let doc = Html::parse_document(
            "<html><head><title>From Title | Medium</title></head><body><h1>From H1</h1></body></html>",
        );
        assert_eq!(extract_title(&doc, &cleaner()).as_deref(), Some("From Title"));
    }

    #[test]
    fn test_falls_back_to_first_h1() {
        let doc = Html::parse_document(
            "<html><body><h1>  First Heading </h1><h1>Second</h1></body></html>",
        );
        assert_eq!(extract_title(&doc, &cleaner()).as_deref(), Some("First Heading"));
    }

    #[test]
    fn test_suffix_only_title_falls_back_to_h1() {
        let doc = Html::parse_document(
            "<html><head><title> | Medium</title></head><body><h1>Heading</h1></body></html>",
        );
        assert_eq!(extract_title(&doc, &cleaner()).as_deref(), Some("Heading"));
    }

    #[test]
    fn test_no_title_sources() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert_eq!(extract_title(&doc, &cleaner()), None);
    }
}
