//! Paginated JSON Feed.
//!
//! The sorted items are split into pages of `feed.page_size`. Page 0 lives at
//! `feed.json_path` (default `feeds/json`), page `n` at the same path with `n`
//! appended (`feeds/json1`, `feeds/json2`, ...). Every page except the last
//! links to the next one through `next_url`.

use crate::item::Item;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Feed page size must be at least 1")]
    PageSize,
}

/// One page of the feed document.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage<'a> {
    pub version: &'static str,
    pub title: &'a str,
    pub home_page_url: &'a str,
    pub feed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    pub items: &'a [Item],
}

/// Feed-level values shared by every page.
#[derive(Debug, Clone, Copy)]
pub struct FeedInfo<'a> {
    pub title: &'a str,
    pub home_page_url: &'a str,
    pub base_url: &'a Url,
    /// Path of page 0, relative to the blog root and the base URL.
    pub path: &'a str,
}

/// Split `items` into `ceil(n / page_size)` pages, at least one.
pub fn paginate<'a>(
    items: &'a [Item],
    page_size: usize,
    info: &FeedInfo<'a>,
) -> Result<Vec<FeedPage<'a>>, FeedError> {
    if page_size == 0 {
        return Err(FeedError::PageSize);
    }
    let feed_url = info.base_url.join(info.path)?.to_string();

    let chunks: Vec<&[Item]> = if items.is_empty() {
        vec![items]
    } else {
        items.chunks(page_size).collect()
    };
    let count = chunks.len();

    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| FeedPage {
            version: JSON_FEED_VERSION,
            title: info.title,
            home_page_url: info.home_page_url,
            feed_url: feed_url.clone(),
            next_url: (i + 1 < count).then(|| format!("{}{}", feed_url, i + 1)),
            items: chunk,
        })
        .collect())
}

/// File for page `index`: the base path, suffixed with the index after page 0.
pub fn page_path(root: &Path, path: &str, index: usize) -> PathBuf {
    if index == 0 {
        root.join(path)
    } else {
        root.join(format!("{path}{index}"))
    }
}

/// Write every page as tab-indented JSON. Returns the written paths.
pub fn write_pages(
    pages: &[FeedPage<'_>],
    root: &Path,
    path: &str,
) -> Result<Vec<PathBuf>, FeedError> {
    let mut written = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let out = page_path(root, path, i);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out, to_json(page)?)?;
        written.push(out);
    }
    Ok(written)
}

fn to_json(page: &FeedPage<'_>) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    page.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn info(base: &Url) -> FeedInfo<'_> {
        FeedInfo {
            title: "ratan.blog",
            home_page_url: "http://ratan.blog",
            base_url: base,
            path: "feeds/json",
        }
    }

    fn numbered_items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| make_item(&format!("Post {i}"), "2017-06-10T09:00:00Z", &[]))
            .collect()
    }

    #[test]
    fn empty_blog_has_one_empty_page() {
        let base = base_url();
        let pages = paginate(&[], 15, &info(&base)).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.is_empty());
        assert!(pages[0].next_url.is_none());
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let base = base_url();
        let items = numbered_items(30);
        let pages = paginate(&items, 15, &info(&base)).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].items.len(), 15);
    }

    #[test]
    fn pages_partition_items_in_order() {
        let base = base_url();
        for (n, size) in [(1, 15), (16, 15), (31, 15), (7, 2), (10, 1)] {
            let items = numbered_items(n);
            let pages = paginate(&items, size, &info(&base)).unwrap();
            assert_eq!(pages.len(), n.div_ceil(size), "n={n} size={size}");

            let joined: Vec<&Item> = pages.iter().flat_map(|p| p.items.iter()).collect();
            let expected: Vec<&Item> = items.iter().collect();
            assert_eq!(joined, expected);

            let (last, rest) = pages.split_last().unwrap();
            assert!(last.next_url.is_none());
            assert!(rest.iter().all(|p| p.next_url.is_some()));
        }
    }

    #[test]
    fn next_url_is_feed_url_plus_index() {
        let base = base_url();
        let items = numbered_items(40);
        let pages = paginate(&items, 15, &info(&base)).unwrap();
        assert_eq!(pages[0].feed_url, "http://ratan.blog/feeds/json");
        assert_eq!(
            pages[0].next_url.as_deref(),
            Some("http://ratan.blog/feeds/json1")
        );
        assert_eq!(
            pages[1].next_url.as_deref(),
            Some("http://ratan.blog/feeds/json2")
        );
    }

    #[test]
    fn zero_page_size_is_an_error() {
        let base = base_url();
        assert!(matches!(
            paginate(&[], 0, &info(&base)),
            Err(FeedError::PageSize)
        ));
    }

    #[test]
    fn write_pages_uses_suffixed_paths() {
        let tmp = TempDir::new().unwrap();
        let base = base_url();
        let items = numbered_items(3);
        let pages = paginate(&items, 2, &info(&base)).unwrap();

        let written = write_pages(&pages, tmp.path(), "feeds/json").unwrap();
        assert_eq!(
            written,
            vec![
                tmp.path().join("feeds/json"),
                tmp.path().join("feeds/json1"),
            ]
        );

        let first = fs::read_to_string(&written[0]).unwrap();
        assert!(first.starts_with("{\n\t\"version\": \"https://jsonfeed.org/version/1\""));
        let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed["items"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["next_url"], "http://ratan.blog/feeds/json1");

        let last: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert!(last.get("next_url").is_none());
    }

    #[test]
    fn markup_in_items_is_not_escaped() {
        let base = base_url();
        let mut items = numbered_items(1);
        items[0].content_html = "<p>a & b</p>".into();
        let pages = paginate(&items, 15, &info(&base)).unwrap();
        let json = String::from_utf8(to_json(&pages[0]).unwrap()).unwrap();
        assert!(json.contains("<p>a & b</p>"));
    }
}
