//! Error types for the sync pipeline.
//!
//! Extraction sources that are missing or malformed never surface as errors;
//! the cascades in [`crate::extractors`] return `Option` instead. What remains
//! are records that fail acceptance ([`Rejection`]) and everything that can go
//! wrong around them ([`SyncError`]).

use std::path::PathBuf;
use thiserror::Error;

/// Why an extracted document was not accepted as a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("missing title")]
    MissingTitle,

    #[error("title {title:?} produced an empty slug")]
    EmptySlug { title: String },

    #[error("slug {slug:?} already used by {existing}")]
    SlugCollision { slug: String, existing: String },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid feed URL {url:?}: {source}")]
    InvalidFeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("record rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(source: std::io::Error) -> Self {
        SyncError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::MissingTitle.to_string(), "missing title");
        let empty = Rejection::EmptySlug {
            title: "???".to_string(),
        };
        assert_eq!(empty.to_string(), r#"title "???" produced an empty slug"#);
    }

    #[test]
    fn test_io_error_names_path() {
        let err = SyncError::io(
            "out/page.svelte",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/page.svelte"));
        assert!(msg.contains("denied"));
    }
}
