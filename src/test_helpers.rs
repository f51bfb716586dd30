//! Shared test utilities for the tqblog test suite.
//!
//! Provides fixture builders for article directories and whole blogs, plus
//! lookup helpers over rendered items.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let blog = blog_fixture();
//! let report = regenerate(blog.path(), &config, &templates, fixed_now()).unwrap();
//!
//! let first = find_item(&report.items, "First Post");
//! assert_eq!(first.tags, vec!["rust", "meta"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tempfile::TempDir;
use url::Url;

use crate::article::MARKDOWN_SOURCE;
use crate::item::Item;
use crate::template::PageTemplate;

/// First line is the title, so tests can check it without parsing HTML.
pub const TEST_TEMPLATE: &str = "{{ title }}\n{{ date }}\n{{ content_html }}\n";

pub fn base_url() -> Url {
    Url::parse("http://ratan.blog").unwrap()
}

/// The instant every test run pretends is "now".
pub fn fixed_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2018-01-01T12:00:00Z").unwrap()
}

pub fn test_template() -> PageTemplate {
    PageTemplate::from_source(TEST_TEMPLATE).unwrap()
}

/// Write `template.html` into a blog root.
pub fn write_test_template(root: &Path) {
    fs::write(root.join("template.html"), TEST_TEMPLATE).unwrap();
}

fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

// =========================================================================
// Item and article builders
// =========================================================================

/// An item as it would be persisted, with the URL derived from the title.
///
/// `published` is stored verbatim so tests can use unparseable dates.
pub fn make_item(title: &str, published: &str, tags: &[&str]) -> Item {
    let url = format!("http://ratan.blog/{}", slug(title));
    Item {
        id: url.clone(),
        url,
        title: title.to_string(),
        content_html: format!("<p>{title}</p>\n"),
        date_published: published.to_string(),
        date_modified: published.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        attachments: Vec::new(),
    }
}

/// Create `<root>/<name>/` with a `content.md` and a previous `item.json`.
pub fn write_article(
    root: &Path,
    name: &str,
    title: &str,
    published: &str,
    tags: &[&str],
) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(MARKDOWN_SOURCE), format!("Body of *{title}*.\n")).unwrap();

    let mut item = make_item(title, published, tags);
    item.url = format!("http://ratan.blog/{name}");
    item.id = item.url.clone();
    item.persist(&dir).unwrap();
    dir
}

/// A blog with a template and two rendered-before articles.
///
/// | Directory     | Title        | Published  | Tags        |
/// |---------------|--------------|------------|-------------|
/// | `first-post`  | First Post   | 2017-06-10 | rust, meta  |
/// | `second-post` | Second Post  | 2017-06-12 | rust        |
pub fn blog_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_test_template(tmp.path());
    write_article(
        tmp.path(),
        "first-post",
        "First Post",
        "2017-06-10T09:00:00Z",
        &["rust", "meta"],
    );
    write_article(
        tmp.path(),
        "second-post",
        "Second Post",
        "2017-06-12T09:00:00Z",
        &["rust"],
    );
    tmp
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find an item by title. Panics if not found.
pub fn find_item<'a>(items: &'a [Item], title: &str) -> &'a Item {
    items.iter().find(|i| i.title == title).unwrap_or_else(|| {
        panic!(
            "item '{title}' not found. Available: {:?}",
            item_titles(items)
        )
    })
}

/// Titles in order.
pub fn item_titles(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}
