//! Command-line interface definitions for Medium Sync.
//!
//! Every argument is optional: running `medium_sync` with no flags reads
//! `completed-articles/` and writes into the SvelteKit tree with the default
//! configuration (see [`crate::config::SyncConfig`]).

use crate::config::RendererKind;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Medium Sync application.
///
/// # Examples
///
/// ```sh
/// # Defaults for everything
/// medium_sync
///
/// # Settings from a file, one override on top
/// medium_sync --config sync.yaml --renderer inline
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "MEDIUM_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing saved `*.html` exports
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Root directory for generated article pages
    #[arg(short, long)]
    pub page_dir: Option<PathBuf>,

    /// Path of the consolidated articles JSON index
    #[arg(long)]
    pub index_path: Option<PathBuf>,

    /// Author name stripped from titles and bylines
    #[arg(long)]
    pub author: Option<String>,

    /// Site name stripped from the end of `<title>` text
    #[arg(long)]
    pub site_name: Option<String>,

    /// Page layout to generate
    #[arg(short, long, value_enum)]
    pub renderer: Option<RendererKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::parse_from(["medium_sync"]);
        assert!(cli.input_dir.is_none());
        assert!(cli.page_dir.is_none());
        assert!(cli.renderer.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "medium_sync",
            "-i",
            "/tmp/html",
            "-p",
            "/tmp/pages",
            "-r",
            "inline",
        ]);

        assert_eq!(cli.input_dir, Some(PathBuf::from("/tmp/html")));
        assert_eq!(cli.page_dir, Some(PathBuf::from("/tmp/pages")));
        assert_eq!(cli.renderer, Some(RendererKind::Inline));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "medium_sync",
            "--index-path",
            "data/articles.json",
            "--author",
            "Jane Doe",
            "--site-name",
            "Substack",
        ]);

        assert_eq!(cli.index_path, Some(PathBuf::from("data/articles.json")));
        assert_eq!(cli.author.as_deref(), Some("Jane Doe"));
        assert_eq!(cli.site_name.as_deref(), Some("Substack"));
    }
}
