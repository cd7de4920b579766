//! Run configuration.
//!
//! Every setting has a default, so a bare `medium_sync` invocation works from
//! the site repository root. A YAML file passed with `--config` replaces any
//! subset of the defaults, and individual CLI flags override both.
//!
//! ```yaml
//! input_dir: completed-articles
//! output_page_dir: src/routes/thoughts
//! output_index_path: src/lib/data/articles.json
//! author_name: Kai Maurin-Jones
//! site_name: Medium
//! renderer: script
//! on_slug_collision: reject
//! feed:
//!   site_url: https://kmaurinjones.dev
//!   title: Kai Maurin-Jones - Thoughts
//!   description: Articles and writings on AI
//!   author: Kai Maurin-Jones
//!   email: hello@kmaurinjones.dev
//!   audio_dir: static/audio/thoughts
//! ```

use crate::cli::Cli;
use crate::errors::{Result, SyncError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Which page layout to generate for each record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Metadata and content as constants in the `<script>` block.
    #[default]
    Script,
    /// Content as a template literal inside the layout markup.
    Inline,
}

/// What to do when two documents normalize to the same slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the first record; drop later ones with a diagnostic.
    #[default]
    Reject,
    /// Keep all records, appending `-2`, `-3`, … to later slugs.
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    pub input_dir: PathBuf,
    pub output_page_dir: PathBuf,
    pub output_index_path: PathBuf,
    pub author_name: String,
    pub site_name: String,
    pub renderer: RendererKind,
    pub on_slug_collision: CollisionPolicy,
    pub feed: Option<FeedConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            input_dir: PathBuf::from("completed-articles"),
            output_page_dir: PathBuf::from("src/routes/thoughts"),
            output_index_path: PathBuf::from("src/lib/data/articles.json"),
            author_name: "Kai Maurin-Jones".to_string(),
            site_name: "Medium".to_string(),
            renderer: RendererKind::default(),
            on_slug_collision: CollisionPolicy::default(),
            feed: None,
        }
    }
}

/// Settings for the optional RSS feed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedConfig {
    pub site_url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    #[serde(default = "default_feed_path")]
    pub output_path: PathBuf,
    #[serde(default)]
    pub audio_dir: Option<PathBuf>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default = "default_podcast_category")]
    pub category: String,
}

fn default_route_prefix() -> String {
    "thoughts".to_string()
}

fn default_feed_path() -> PathBuf {
    PathBuf::from("static/thoughts/rss.xml")
}

fn default_podcast_category() -> String {
    "Technology".to_string()
}

impl SyncConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Resolve the effective configuration for a run: defaults, then the
    /// optional YAML file, then individual CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.input_dir {
            self.input_dir = dir.clone();
        }
        if let Some(dir) = &cli.page_dir {
            self.output_page_dir = dir.clone();
        }
        if let Some(path) = &cli.index_path {
            self.output_index_path = path.clone();
        }
        if let Some(author) = &cli.author {
            self.author_name = author.clone();
        }
        if let Some(site) = &cli.site_name {
            self.site_name = site.clone();
        }
        if let Some(renderer) = cli.renderer {
            self.renderer = renderer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("completed-articles"));
        assert_eq!(config.site_name, "Medium");
        assert_eq!(config.renderer, RendererKind::Script);
        assert_eq!(config.on_slug_collision, CollisionPolicy::Reject);
        assert!(config.feed.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SyncConfig::from_yaml_str("author_name: Jane Doe\nrenderer: inline\n").unwrap();
        assert_eq!(config.author_name, "Jane Doe");
        assert_eq!(config.renderer, RendererKind::Inline);
        assert_eq!(config.output_page_dir, PathBuf::from("src/routes/thoughts"));
    }

    #[test]
    fn test_feed_section_defaults() {
        let yaml = r#"
on_slug_collision: suffix
feed:
  site_url: https://example.dev
  title: Example - Thoughts
  description: Writing
  author: Jane Doe
  email: jane@example.dev
"#;
        let config = SyncConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.on_slug_collision, CollisionPolicy::Suffix);
        let feed = config.feed.unwrap();
        assert_eq!(feed.route_prefix, "thoughts");
        assert_eq!(feed.output_path, PathBuf::from("static/thoughts/rss.xml"));
        assert_eq!(feed.category, "Technology");
        assert!(feed.audio_dir.is_none());
    }

    #[test]
    fn test_unknown_renderer_is_an_error() {
        assert!(SyncConfig::from_yaml_str("renderer: mdx\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sync.yaml");
        fs::write(&path, "input_dir: from-file\nsite_name: Substack\n").unwrap();

        let cli = Cli::parse_from([
            "medium_sync",
            "--config",
            path.to_str().unwrap(),
            "--input-dir",
            "from-cli",
        ]);
        let config = SyncConfig::resolve(&cli).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("from-cli"));
        assert_eq!(config.site_name, "Substack");
    }

    #[test]
    fn test_missing_config_file_names_path() {
        let err = SyncConfig::from_yaml_file(Path::new("/nonexistent/sync.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sync.yaml"));
    }
}
