//! # Medium Sync
//!
//! Converts a folder of saved Medium article pages into a SvelteKit site's
//! article routes, a consolidated JSON index, and optionally an RSS feed.
//!
//! ## Features
//!
//! - Extracts title, canonical URL, publication date, and categories from
//!   each saved `*.html` export
//! - Strips Medium's interface chrome (toolbars, member badges, paywall
//!   notices, bylines) from the article body
//! - Writes one `+page.svelte` per article in either of two layouts
//! - Writes `articles.json` for the listing page and, when configured, an
//!   RSS 2.0 feed with iTunes tags for narrated articles
//!
//! ## Usage
//!
//! ```sh
//! medium_sync -i ./completed-articles -p ./src/routes/thoughts
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: List `*.html` files in the input directory
//! 2. **Extraction**: Parse each document and assemble an article record,
//!    rejecting documents without a usable title
//! 3. **Output**: Write pages, the index, and the feed for accepted records
//!
//! A document that fails never stops the batch; it is logged and counted.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod batch;
mod cli;
mod config;
mod errors;
mod extractors;
mod models;
mod outputs;
mod utils;

use batch::{BatchOutcome, run_batch};
use cli::Cli;
use config::SyncConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("medium_sync starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = SyncConfig::resolve(&args)?;
    info!(
        input_dir = %config.input_dir.display(),
        page_dir = %config.output_page_dir.display(),
        index_path = %config.output_index_path.display(),
        renderer = ?config.renderer,
        feed = config.feed.is_some(),
        "Configuration resolved"
    );

    let report = run_batch(&config).await?;

    let elapsed = start_time.elapsed();
    match report.outcome {
        BatchOutcome::Completed => info!(
            found = report.found,
            accepted = report.accepted,
            rejected = report.rejected,
            failed = report.failed,
            elapsed_secs = elapsed.as_secs_f64(),
            "Sync finished"
        ),
        outcome => info!(?outcome, elapsed_secs = elapsed.as_secs_f64(), "Nothing written"),
    }

    Ok(report.outcome.exit_code())
}
