//! Utility functions for slug generation, log formatting, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Slugification of article titles into URL-safe path segments
//! - String truncation for log fields
//! - File system validation for output directories

use crate::errors::{Result, SyncError};
use deunicode::deunicode;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a title to a URL-friendly slug.
///
/// The title is transliterated to ASCII (`Über` becomes `uber`) and
/// lowercased. Every character that is not a letter, digit, whitespace, or
/// hyphen is then dropped, runs of whitespace and hyphens collapse into a
/// single `-`, and leading/trailing hyphens are stripped.
///
/// The result always matches `[a-z0-9]+(-[a-z0-9]+)*` or is empty (when the
/// title held nothing slug-able). Slugifying a slug returns it unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  --Trim--  "), "trim");
/// assert_eq!(slugify("Café au lait"), "cafe-au-lait");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in deunicode(title).to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
        // anything else is dropped without breaking the current run
    }

    slug
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| SyncError::io(path, e))?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(SyncError::io(probe_path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        let s = "ééééé";
        let result = truncate_for_log(s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("(+8 bytes)"));
    }

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --Trim--  "), "trim");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("Special@#$Characters"), "specialcharacters");
        assert_eq!(slugify("Trump-Xi 'situationship'"), "trump-xi-situationship");
        assert_eq!(slugify("GPT - 4 — a review"), "gpt-4-a-review");
    }

    #[test]
    fn test_slugify_transliterates_accented_letters() {
        assert_eq!(slugify("Über Rust"), "uber-rust");
        assert_eq!(slugify("Café au lait"), "cafe-au-lait");
        assert_eq!(slugify("Ünïcödé Títlé 2025"), "unicode-title-2025");
        assert_eq!(slugify("Straße naïve résumé"), "strasse-naive-resume");
    }

    #[test]
    fn test_slugify_is_idempotent_on_slugs() {
        for slug in ["hello-world", "a", "2024-in-review", "x1-y2-z3"] {
            assert_eq!(slugify(slug), slug);
            assert_eq!(slugify(&slugify(slug)), slug);
        }
    }

    #[test]
    fn test_slugify_only_punctuation_is_empty() {
        assert_eq!(slugify("?!... --- ***"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_output_shape() {
        let pattern = regex::Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
        for title in [
            "Why I Quit -- and Came Back",
            "Ünïcödé Títlé 2025",
            "  leading and trailing  ",
            "under_score and dots.",
        ] {
            let slug = slugify(title);
            assert!(pattern.is_match(&slug), "bad slug {slug:?} for {title:?}");
        }
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
