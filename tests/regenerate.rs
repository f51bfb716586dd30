//! End-to-end regeneration of a small blog through the public API.

use chrono::DateTime;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tqblog::article::{RenderContext, RenderOptions, render_article};
use tqblog::config::{BlogConfig, load_config};
use tqblog::item::Item;
use tqblog::regenerate::{ARCHIVE_DIR, TAGS_DIR, Templates, regenerate};
use tqblog::template::{OUTPUT_PAGE, PageTemplate};

const TEMPLATE: &str = "{{ title }}\n{{ date }}\n{{ content_html }}\n";

/// Write an article folder with a markdown source and a previous item record.
fn write_article(root: &Path, name: &str, title: &str, published: &str, tags: &[&str]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("content.md"), format!("# {title}\n\nHello from *{name}*.\n")).unwrap();

    let url = format!("http://ratan.blog/{name}");
    let item = Item {
        id: url.clone(),
        url,
        title: title.to_string(),
        content_html: String::new(),
        date_published: published.to_string(),
        date_modified: published.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        attachments: Vec::new(),
    };
    item.persist(&dir).unwrap();
}

fn blog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("template.html"), TEMPLATE).unwrap();
    write_article(
        tmp.path(),
        "moon",
        "Moon",
        "1969-07-20T20:17:00Z",
        &["space", "history"],
    );
    write_article(
        tmp.path(),
        "hello-world",
        "Hello World",
        "2017-06-10T09:00:00Z",
        &["meta"],
    );
    tmp
}

fn now() -> chrono::DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339("2018-01-01T12:00:00Z").unwrap()
}

fn first_line(path: &Path) -> String {
    let text = fs::read_to_string(path).unwrap();
    text.lines().next().unwrap_or_default().to_string()
}

#[test]
fn regenerates_pages_and_feeds() {
    let blog = blog();
    let config = load_config(blog.path()).unwrap();
    let templates = Templates::from_config(blog.path(), &config.templates).unwrap();

    let report = regenerate(blog.path(), &config, &templates, now()).unwrap();
    let titles: Vec<&str> = report.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Hello World", "Moon"]);

    // Each article page starts with its own title
    for item in &report.items {
        let name = item.url.rsplit('/').next().unwrap();
        assert_eq!(first_line(&report.root.join(name).join(OUTPUT_PAGE)), item.title);
    }

    // Homepage is the newest article
    assert_eq!(first_line(&report.root.join(OUTPUT_PAGE)), "Hello World");

    let feed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report.root.join("feeds/json")).unwrap()).unwrap();
    assert_eq!(feed["version"], "https://jsonfeed.org/version/1");
    assert_eq!(feed["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(feed["items"][0]["title"], "Hello World");
    assert!(feed.get("next_url").is_none());

    let archive = fs::read_to_string(report.root.join(ARCHIVE_DIR).join(OUTPUT_PAGE)).unwrap();
    assert!(archive.contains("<h3>Lavoisier, 48 AT</h3>"));
    assert!(archive.contains("<h3>Moon Landing Day, 0 AT</h3>"));

    let tags = fs::read_to_string(report.root.join(TAGS_DIR).join(OUTPUT_PAGE)).unwrap();
    let history = tags.find("<h3>History</h3>").unwrap();
    let meta = tags.find("<h3>Meta</h3>").unwrap();
    let space = tags.find("<h3>Space</h3>").unwrap();
    assert!(history < meta && meta < space);

    assert!(report.root.join("feeds/atom").is_file());
    assert!(report.root.join("feeds/rss").is_file());
}

#[test]
fn rendering_keeps_publish_date_and_updates_item_record() {
    let blog = blog();
    let config = BlogConfig::default();
    let templates = Templates::from_config(blog.path(), &config.templates).unwrap();
    regenerate(blog.path(), &config, &templates, now()).unwrap();

    let dir = blog.path().join("hello-world");
    let item = Item::load_previous(&dir).unwrap().unwrap();
    assert_eq!(item.date_published, "2017-06-10T09:00:00Z");
    assert_eq!(item.tags, vec!["meta"]);
    assert!(item.content_html.contains("<em>hello-world</em>"));
}

#[test]
fn single_article_overrides_are_persisted() {
    let blog = blog();
    let base = BlogConfig::default().base_url().unwrap();
    let template = PageTemplate::from_source(TEMPLATE).unwrap();
    let ctx = RenderContext {
        base_url: &base,
        template: &template,
        stylesheet: None,
        now: now(),
    };
    let options = RenderOptions {
        title: Some("Renamed".into()),
        tags: Some(vec!["new".into()]),
    };

    let dir = blog.path().join("moon");
    let item = render_article(&dir, &options, &ctx).unwrap();
    assert_eq!(item.title, "Renamed");
    assert_eq!(first_line(&dir.join(OUTPUT_PAGE)), "Renamed");

    let persisted = Item::load_previous(&dir).unwrap().unwrap();
    assert_eq!(persisted.title, "Renamed");
    assert_eq!(persisted.tags, vec!["new"]);
}
