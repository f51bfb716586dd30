//! The per-article record.
//!
//! An [`Item`] is what the blog knows about one article. It is persisted as
//! `item.json` inside the article directory, uses the JSON Feed item schema,
//! and is the unit every derived page and feed is built from.
//!
//! ```json
//! {
//!   "id": "http://ratan.blog/first-post",
//!   "url": "http://ratan.blog/first-post",
//!   "title": "First Post",
//!   "content_html": "<p>Hello</p>\n",
//!   "date_published": "2017-06-10T09:00:00Z",
//!   "date_modified": "2017-06-11T10:30:00Z",
//!   "tags": ["meta"],
//!   "attachments": [{ "url": "...", "mime_type": "image/png" }]
//! }
//! ```
//!
//! The modification timestamp is never earlier than the publish timestamp:
//! an article does not exist, as far as readers are concerned, before it is
//! published.

use crate::dates;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Persisted metadata file inside each article directory.
pub const ITEM_FILE: &str = "item.json";

/// Subdirectory holding an article's attachment files.
pub const ATTACHMENT_DIR: &str = "attachments";

#[derive(Error, Debug)]
pub enum ItemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Blank title")]
    BlankTitle,
    #[error("Article directory has no name: {0}")]
    BlankDirectory(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub mime_type: String,
    /// True for attachments built at render time, once the MIME type is known.
    /// Never persisted, so reloaded attachments read as false.
    #[serde(skip)]
    pub valid: bool,
}

impl Attachment {
    /// Attachment at `<base>/<article>/attachments/<basename>`.
    pub fn new(
        base: &Url,
        article: &str,
        basename: &str,
        mime_type: String,
    ) -> Result<Self, ItemError> {
        let url = base.join(&format!("./{article}/{ATTACHMENT_DIR}/{basename}"))?;
        Ok(Self {
            url: url.to_string(),
            mime_type,
            valid: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content_html: String,
    pub date_published: String,
    pub date_modified: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attachments: Vec<Attachment>,
}

impl Item {
    /// Build the record for the article in `directory`.
    ///
    /// The URL (and id) is the base URL joined with the directory name.
    /// `modified` is clamped so it never precedes `published`.
    pub fn new(
        base: &Url,
        directory: &Path,
        title: &str,
        published: DateTime<FixedOffset>,
        modified: DateTime<FixedOffset>,
    ) -> Result<Self, ItemError> {
        if title.trim().is_empty() {
            return Err(ItemError::BlankTitle);
        }
        let name = article_name(directory)?;
        let url = base.join(&format!("./{name}"))?.to_string();
        let modified = modified.max(published);

        Ok(Self {
            id: url.clone(),
            url,
            title: title.to_string(),
            content_html: String::new(),
            date_published: dates::format_rfc3339(&published),
            date_modified: dates::format_rfc3339(&modified),
            tags: Vec::new(),
            attachments: Vec::new(),
        })
    }

    pub fn published(&self) -> Option<DateTime<FixedOffset>> {
        dates::parse_rfc3339(&self.date_published).ok()
    }

    pub fn modified(&self) -> Option<DateTime<FixedOffset>> {
        dates::parse_rfc3339(&self.date_modified).ok()
    }

    /// Load the record persisted in `directory`.
    ///
    /// A missing file means the article has never been rendered and yields
    /// `Ok(None)`. A file that exists but cannot be read or parsed is an error.
    pub fn load_previous(directory: &Path) -> Result<Option<Self>, ItemError> {
        let path = directory.join(ITEM_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the record to `directory`, replacing any previous one.
    pub fn persist(&self, directory: &Path) -> Result<(), ItemError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(directory.join(ITEM_FILE), json)?;
        Ok(())
    }
}

/// Final path component of an article directory, as used in URLs.
pub fn article_name(directory: &Path) -> Result<&str, ItemError> {
    directory
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ItemError::BlankDirectory(directory.display().to_string()))
}

/// Older metadata files wrote `null` for empty lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
