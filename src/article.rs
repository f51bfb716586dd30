//! Rendering a single article.
//!
//! Given an article directory, [`render_article`] produces the rendered page
//! (`index.html`) and the persisted [`Item`] (`item.json`). Values are
//! resolved in priority order:
//!
//! | Field     | 1st                  | 2nd                   | Fallback            |
//! |-----------|----------------------|-----------------------|---------------------|
//! | title     | `--title` override   | previous `item.json`  | error (blank title) |
//! | tags      | `--tags` override    | previous `item.json`  | none                |
//! | published |                      | previous `item.json`  | now                 |
//! | modified  | content file mtime (never earlier than published)              |||
//!
//! Content comes from `content.md` (converted with pulldown-cmark) when
//! present, otherwise from `content.html` as-is. Attachments are every file
//! in `attachments/`; one that cannot be read is logged and left out.

use crate::dates;
use crate::item::{Attachment, Item, ItemError, article_name};
use crate::scan::{self, ScanError};
use crate::sniff;
use crate::template::{PageContext, PageTemplate, TemplateError};
use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const MARKDOWN_SOURCE: &str = "content.md";
pub const HTML_SOURCE: &str = "content.html";

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("No 'content.md' or 'content.html' found in {0}")]
    NoContent(PathBuf),
    #[error("Invalid date_published '{value}' in previous item: {source}")]
    PublishDate {
        value: String,
        source: chrono::ParseError,
    },
}

/// Explicit per-invocation overrides. The default overrides nothing, which
/// is what a full regeneration uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Everything shared by all articles of one run.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub base_url: &'a Url,
    pub template: &'a PageTemplate,
    pub stylesheet: Option<&'a str>,
    pub now: DateTime<FixedOffset>,
}

impl RenderContext<'_> {
    /// Template data for a page in this run. The title is plain text and is
    /// escaped; `date` and `content_html` are markup and pass through.
    pub fn page(&self, title: &str, date: String, content_html: String) -> PageContext {
        PageContext {
            title: tera::escape_html(title),
            date,
            today: dates::today_string(&self.now),
            content_html,
            stylesheet: self.stylesheet.map(String::from),
        }
    }
}

/// Render the article in `dir`, write its page, and persist its item.
pub fn render_article(
    dir: &Path,
    options: &RenderOptions,
    ctx: &RenderContext<'_>,
) -> Result<Item, ArticleError> {
    let dir = fs::canonicalize(dir)?;
    let previous = Item::load_previous(&dir)?;
    if previous.is_none() {
        debug!("{}: no previous item, treating as new", dir.display());
    }

    let title = resolve(&[
        options.title.as_deref(),
        previous.as_ref().map(|p| p.title.as_str()),
    ])
    .unwrap_or_default();

    let tags = match (&options.tags, &previous) {
        (Some(tags), _) => normalize_tags(tags),
        (None, Some(prev)) => prev.tags.clone(),
        (None, None) => Vec::new(),
    };

    let published = match &previous {
        Some(prev) => dates::parse_rfc3339(&prev.date_published).map_err(|source| {
            ArticleError::PublishDate {
                value: prev.date_published.clone(),
                source,
            }
        })?,
        None => ctx.now,
    };

    let (content_html, modified) = load_content(&dir)?;

    let mut item = Item::new(ctx.base_url, &dir, &title, published, modified)?;
    item.content_html = content_html;
    item.tags = tags;
    item.attachments = load_attachments(&dir, ctx.base_url)?;

    let page = ctx.page(
        &item.title,
        dates::dual_date(&published),
        item.content_html.clone(),
    );
    ctx.template.write_page(&page, &dir)?;
    item.persist(&dir)?;

    debug!(
        "Rendered {} ({} tags, {} attachments)",
        item.url,
        item.tags.len(),
        item.attachments.len()
    );
    Ok(item)
}

/// First non-empty value after trimming.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Trim each tag and drop blanks; order and duplicates are kept.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Article body as HTML, with the source file's modification time.
fn load_content(dir: &Path) -> Result<(String, DateTime<FixedOffset>), ArticleError> {
    let markdown = dir.join(MARKDOWN_SOURCE);
    if markdown.is_file() {
        let source = fs::read_to_string(&markdown)?;
        return Ok((markdown_to_html(&source), mtime(&markdown)?));
    }
    let html = dir.join(HTML_SOURCE);
    if html.is_file() {
        return Ok((fs::read_to_string(&html)?, mtime(&html)?));
    }
    Err(ArticleError::NoContent(dir.to_path_buf()))
}

pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;
    let parser = Parser::new_ext(source, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

fn mtime(path: &Path) -> Result<DateTime<FixedOffset>, ArticleError> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(dates::from_system_time(modified))
}

fn load_attachments(dir: &Path, base: &Url) -> Result<Vec<Attachment>, ArticleError> {
    let article = article_name(dir)?;
    let attachments = scan::attachment_paths(dir)?
        .iter()
        .filter_map(|path| match load_attachment(path, article, base) {
            Ok(attachment) => Some(attachment),
            Err(e) => {
                warn!("Skipping attachment {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    Ok(attachments)
}

fn load_attachment(path: &Path, article: &str, base: &Url) -> Result<Attachment, ArticleError> {
    let mime_type = sniff::sniff_file(path)?;
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "file name is not UTF-8")
        })?;
    Ok(Attachment::new(base, article, basename, mime_type.to_string())?)
}
