//! Batch orchestration.
//!
//! Documents are processed one at a time. Each one either becomes an
//! accepted [`ArticleRecord`] or is counted and reported without stopping
//! the run: rejected documents get a `warn!`, documents that could not be
//! processed at all get an `error!`. Only once every input has been seen are
//! any outputs written, and output failures do abort the run.

use crate::config::{CollisionPolicy, SyncConfig};
use crate::errors::{Rejection, Result, SyncError};
use crate::extractors::ArticleExtractor;
use crate::models::ArticleRecord;
use crate::outputs::{feed, json, pages};
use crate::utils::{ensure_writable_dir, truncate_for_log};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// At least one record was accepted and all outputs were written.
    Completed,
    /// The input directory held no `*.html` files (or did not exist).
    NoInputFound,
    /// Inputs were found but every one was rejected or failed.
    NoRecordsAccepted,
}

impl BatchOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            BatchOutcome::Completed | BatchOutcome::NoInputFound => ExitCode::SUCCESS,
            BatchOutcome::NoRecordsAccepted => ExitCode::from(2),
        }
    }
}

/// A document that produced no record, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub found: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub pages: Vec<PathBuf>,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchReport {
    fn empty(outcome: BatchOutcome, found: usize) -> Self {
        BatchReport {
            outcome,
            found,
            accepted: 0,
            rejected: 0,
            failed: 0,
            pages: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Tracks which document claimed each slug.
#[derive(Debug, Default)]
struct SlugRegistry {
    owners: HashMap<String, String>,
}

impl SlugRegistry {
    fn admit(
        &mut self,
        record: ArticleRecord,
        source: &str,
        policy: CollisionPolicy,
    ) -> std::result::Result<ArticleRecord, Rejection> {
        let Some(existing) = self.owners.get(&record.slug) else {
            self.owners.insert(record.slug.clone(), source.to_string());
            return Ok(record);
        };

        match policy {
            CollisionPolicy::Reject => Err(Rejection::SlugCollision {
                slug: record.slug.clone(),
                existing: existing.clone(),
            }),
            CollisionPolicy::Suffix => {
                let slug = (2..)
                    .map(|n| format!("{}-{}", record.slug, n))
                    .find(|candidate| !self.owners.contains_key(candidate))
                    .unwrap_or_default();
                warn!(
                    original = %record.slug,
                    %slug,
                    existing = %existing,
                    file = %source,
                    "Slug collision; using suffixed slug"
                );
                self.owners.insert(slug.clone(), source.to_string());
                Ok(ArticleRecord { slug, ..record })
            }
        }
    }
}

/// List `*.html` files in `dir`, sorted by name. A missing directory is
/// treated as empty.
pub async fn list_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SyncError::io(dir, e)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SyncError::io(dir, e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "html") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and extract a single document.
#[instrument(level = "info", skip_all, fields(file = %display_name(path)))]
pub async fn process_document(extractor: &ArticleExtractor, path: &Path) -> Result<ArticleRecord> {
    let html = fs::read_to_string(path)
        .await
        .map_err(|e| SyncError::io(path, e))?;
    let record = extractor.extract_record(&html)?;
    debug!(
        slug = %record.slug,
        title = %truncate_for_log(&record.title, 80),
        "Assembled record"
    );
    Ok(record)
}

/// Run one full conversion over `config.input_dir`.
#[instrument(level = "info", skip_all, fields(input_dir = %config.input_dir.display()))]
pub async fn run_batch(config: &SyncConfig) -> Result<BatchReport> {
    let extractor = ArticleExtractor::from_config(config)?;

    let files = list_html_files(&config.input_dir).await?;
    if files.is_empty() {
        info!("No HTML files found in {}", config.input_dir.display());
        return Ok(BatchReport::empty(BatchOutcome::NoInputFound, 0));
    }
    info!(count = files.len(), "Found HTML files");

    let mut report = BatchReport::empty(BatchOutcome::Completed, files.len());
    let mut registry = SlugRegistry::default();
    let mut records = Vec::new();

    for path in &files {
        let file = display_name(path);
        let admitted = process_document(&extractor, path).await.and_then(|record| {
            registry
                .admit(record, &file, config.on_slug_collision)
                .map_err(SyncError::from)
        });
        match admitted {
            Ok(record) => {
                info!(%file, slug = %record.slug, "Parsed article");
                records.push(record);
            }
            Err(SyncError::Rejected(reason)) => {
                let skipped = SkippedDocument {
                    file,
                    reason: reason.to_string(),
                };
                warn!(file = %skipped.file, reason = %skipped.reason, "Skipping document");
                report.rejected += 1;
                report.skipped.push(skipped);
            }
            Err(e) => {
                let skipped = SkippedDocument {
                    file,
                    reason: e.to_string(),
                };
                error!(file = %skipped.file, error = %skipped.reason, "Error processing document");
                report.failed += 1;
                report.skipped.push(skipped);
            }
        }
    }

    report.accepted = records.len();
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        failed = report.failed,
        "Successfully parsed articles"
    );

    if records.is_empty() {
        warn!("No articles to process");
        report.outcome = BatchOutcome::NoRecordsAccepted;
        return Ok(report);
    }

    ensure_writable_dir(&config.output_page_dir).await?;
    let renderer = pages::renderer_for(config.renderer);
    for record in &records {
        let page = pages::write_page(renderer.as_ref(), record, &config.output_page_dir).await?;
        report.pages.push(page);
    }

    json::write_index(&records, &config.output_index_path).await?;

    if let Some(feed_config) = &config.feed {
        feed::write_feed(&records, feed_config).await?;
    }

    info!(pages = report.pages.len(), "Sync complete");
    Ok(report)
}
