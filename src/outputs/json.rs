//! Consolidated article index.
//!
//! The site's listing page reads a single JSON array with one
//! [`IndexEntry`] per accepted record, in assembly order:
//!
//! ```json
//! [
//!   {
//!     "slug": "shipping-rust-at-work",
//!     "title": "Shipping Rust at Work",
//!     "date": "November 03, 2024",
//!     "categories": ["rust"],
//!     "url": "https://medium.com/@kai/shipping-rust-at-work-42"
//!   }
//! ]
//! ```

use crate::errors::{Result, SyncError};
use crate::models::{ArticleRecord, IndexEntry};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub fn index_entries(records: &[ArticleRecord]) -> Vec<IndexEntry> {
    records.iter().map(IndexEntry::from).collect()
}

/// Write the index to `index_path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %index_path.display()))]
pub async fn write_index(records: &[ArticleRecord], index_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&index_entries(records))?;

    if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::io(parent, e))?;
    }

    fs::write(index_path, json)
        .await
        .map_err(|e| SyncError::io(index_path, e))?;
    info!(entries = records.len(), "Wrote articles index");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            slug: slug.to_string(),
            url: None,
            canonical_url: None,
            published_at: None,
            display_date: None,
            categories: vec![],
            content_html: Some("<article>big</article>".to_string()),
        }
    }

    #[tokio::test]
    async fn test_write_index_preserves_order_and_unicode() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("src/lib/data/articles.json");
        let records = vec![record("zeta", "Zeta — Über"), record("alpha", "Alpha")];

        write_index(&records, &path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Zeta — Über"));
        assert!(raw.contains("\n  {\n    \"slug\": \"zeta\""));
        assert!(!raw.contains("contentHtml"));
        assert!(!raw.contains("big"));

        let parsed: Vec<IndexEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].slug, "zeta");
        assert_eq!(parsed[1].slug, "alpha");
        assert_eq!(parsed[1].date, "");
    }
}
