//! Blog configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the blog root, next to the article directories, and is optional: stock
//! defaults apply to anything it does not mention.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Every key may be omitted; these are the defaults
//!
//! [site]
//! url = "http://ratan.blog"      # Base URL; article URLs resolve against it
//! title = "ratan.blog"           # Feed title
//!
//! [templates]
//! article = "template.html"      # Page template, relative to the blog root
//! # home = "home.html"           # Homepage template (defaults to `article`)
//! # stylesheet = "style.css"     # Exposed to templates as `stylesheet`
//!
//! [feed]
//! page_size = 15                 # Items per JSON Feed page
//! json_path = "feeds/json"       # Page N > 0 is written to `feeds/jsonN`
//! atom_path = "feeds/atom"
//! rss_path = "feeds/rss"
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Blog configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Site identity used for URLs and feed headers.
    pub site: SiteConfig,
    /// Template files for rendered pages.
    pub templates: TemplatesConfig,
    /// JSON Feed pagination and legacy feed locations.
    pub feed: FeedConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl BlogConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::Validation(
                "feed.page_size must be at least 1".into(),
            ));
        }
        if Url::parse(&self.site.url).is_err() {
            return Err(ConfigError::Validation(format!(
                "site.url must be an absolute URL, got '{}'",
                self.site.url
            )));
        }
        for (key, path) in [
            ("feed.json_path", &self.feed.json_path),
            ("feed.atom_path", &self.feed.atom_path),
            ("feed.rss_path", &self.feed.rss_path),
        ] {
            if path.is_empty() || Path::new(path).is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a non-empty relative path"
                )));
            }
        }
        Ok(())
    }

    /// Parsed base URL. Only valid after [`validate`](Self::validate).
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.site.url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub url: String,
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://ratan.blog".to_string(),
            title: "ratan.blog".to_string(),
        }
    }
}

/// Template locations. Relative paths resolve against the blog root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub article: PathBuf,
    /// Template for the blog homepage; the article template when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    /// Stylesheet href handed to every template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            article: PathBuf::from("template.html"),
            home: None,
            stylesheet: None,
        }
    }
}

impl TemplatesConfig {
    pub fn article_path(&self, root: &Path) -> PathBuf {
        root.join(&self.article)
    }

    /// Homepage template, when one is configured.
    pub fn home_path(&self, root: &Path) -> Option<PathBuf> {
        self.home.as_ref().map(|home| root.join(home))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Items per JSON Feed page.
    pub page_size: usize,
    pub json_path: String,
    pub atom_path: String,
    pub rss_path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            json_path: "feeds/json".to_string(),
            atom_path: "feeds/atom".to_string(),
            rss_path: "feeds/rss".to_string(),
        }
    }
}

/// Render pool sizing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Cap on parallel render workers. Absent means one per core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Worker count for the rayon pool: all cores, or `max_processes` clamped
/// to `1..=cores`.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BlogConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Layer `overlay` over `base`. Tables merge per key, recursively; any other
/// overlay value replaces the base value. Base keys the overlay lacks survive.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the blog config, merging user values over stock defaults.
pub fn load_config(root: &Path) -> Result<BlogConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: BlogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// A fully-commented stock `config.toml`, printed by `tqblog gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# tqblog configuration
# ====================
# Every setting may be omitted. The file itself is optional.
# Values shown below are the defaults. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Base URL. Article URLs are this URL joined with the article directory name.
url = "http://ratan.blog"

# Title used in the JSON Feed, Atom and RSS documents.
title = "ratan.blog"

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
[templates]
# Tera template for article, archive and tag pages. Relative to the blog root.
# Available variables: title, date, today, content_html, stylesheet.
article = "template.html"

# Template for the homepage (the latest article). Defaults to `article`.
# home = "home.html"

# Stylesheet href passed to templates.
# stylesheet = "/style.css"

# ---------------------------------------------------------------------------
# Feeds
# ---------------------------------------------------------------------------
[feed]
# Items per JSON Feed page. Page 0 is written to json_path, page N to json_pathN.
page_size = 15
json_path = "feeds/json"
atom_path = "feeds/atom"
rss_path = "feeds/rss"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Defaults to one worker per CPU core; larger values are clamped.
# max_processes = 4
"##
}
