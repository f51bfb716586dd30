//! Full blog regeneration.
//!
//! ```text
//! find_article_paths ──► render_all (parallel) ──► sort_by_published
//!                                                       │
//!                     ┌──────────┬──────────┬───────────┼──────────────┐
//!                     ▼          ▼          ▼           ▼              ▼
//!                   Home      Archive      Tags     JSON feed    Atom + RSS
//! ```
//!
//! Every article is re-rendered from its own previous `item.json`. The first
//! article that fails aborts the run; pages already written for other articles
//! stay on disk. After sorting, the five exporters run concurrently over the
//! same read-only item list and write disjoint paths. A failing exporter does
//! not stop its siblings.

use crate::archive;
use crate::article::{ArticleError, RenderContext, RenderOptions, render_article};
use crate::config::{BlogConfig, TemplatesConfig};
use crate::dates;
use crate::feed::{self, FeedError, FeedInfo};
use crate::item::Item;
use crate::markup;
use crate::scan::{self, ScanError};
use crate::syndication::{self, SyndicationError};
use crate::tags;
use crate::template::{PageTemplate, TemplateError};
use chrono::{DateTime, FixedOffset};
use log::{debug, error, info};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ARCHIVE_DIR: &str = "archive";
pub const TAGS_DIR: &str = "tags";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Invalid site URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to render {path}: {source}")]
    Article { path: PathBuf, source: ArticleError },
    #[error("{} export failed: {source}", .exporter.name())]
    Export {
        exporter: Exporter,
        source: ExportError,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Syndication(#[from] SyndicationError),
}

/// The page templates of one run.
#[derive(Debug)]
pub struct Templates {
    /// Articles, the archive page and the tags page.
    pub article: PageTemplate,
    /// The homepage. Falls back to `article`.
    pub home: Option<PageTemplate>,
}

impl Templates {
    pub fn from_config(root: &Path, config: &TemplatesConfig) -> Result<Self, TemplateError> {
        let article = PageTemplate::from_file(&config.article_path(root))?;
        let home = config
            .home_path(root)
            .map(|path| PageTemplate::from_file(&path))
            .transpose()?;
        Ok(Self { article, home })
    }

    pub fn home(&self) -> &PageTemplate {
        self.home.as_ref().unwrap_or(&self.article)
    }
}

/// One of the derived outputs written after all articles are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exporter {
    Home,
    Archive,
    Tags,
    JsonFeed,
    LegacyFeeds,
}

impl Exporter {
    pub const ALL: [Exporter; 5] = [
        Exporter::Home,
        Exporter::Archive,
        Exporter::Tags,
        Exporter::JsonFeed,
        Exporter::LegacyFeeds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Exporter::Home => "Home",
            Exporter::Archive => "Archive",
            Exporter::Tags => "Tags",
            Exporter::JsonFeed => "JSON feed",
            Exporter::LegacyFeeds => "Atom/RSS",
        }
    }
}

/// Files written by one exporter.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub exporter: Exporter,
    pub paths: Vec<PathBuf>,
}

/// Outcome of a full regeneration.
#[derive(Debug)]
pub struct BuildReport {
    pub root: PathBuf,
    /// Every article, newest first.
    pub items: Vec<Item>,
    pub artifacts: Vec<Artifact>,
}

/// Regenerate every article under `root` and all derived pages and feeds.
pub fn regenerate(
    root: &Path,
    config: &BlogConfig,
    templates: &Templates,
    now: DateTime<FixedOffset>,
) -> Result<BuildReport, BuildError> {
    let root = fs::canonicalize(root)?;
    let base_url = config.base_url()?;
    let ctx = RenderContext {
        base_url: &base_url,
        template: &templates.article,
        stylesheet: config.templates.stylesheet.as_deref(),
        now,
    };

    let paths = scan::find_article_paths(&root)?;
    info!("Rendering {} articles in {}", paths.len(), root.display());

    let mut items = render_all(&paths, &ctx)?;
    sort_by_published(&mut items);

    let artifacts = export_all(&root, &items, config, templates, &ctx)?;
    Ok(BuildReport {
        root,
        items,
        artifacts,
    })
}

/// Render a single article with explicit overrides.
pub fn render_one(
    dir: &Path,
    options: &RenderOptions,
    config: &BlogConfig,
    template: &PageTemplate,
    now: DateTime<FixedOffset>,
) -> Result<Item, BuildError> {
    let base_url = config.base_url()?;
    let ctx = RenderContext {
        base_url: &base_url,
        template,
        stylesheet: config.templates.stylesheet.as_deref(),
        now,
    };
    render_article(dir, options, &ctx).map_err(|source| BuildError::Article {
        path: dir.to_path_buf(),
        source,
    })
}

/// Render every article in parallel, without overrides.
///
/// All renders run to completion; the first failure in `paths` order is
/// returned. Successful renders are not rolled back.
pub fn render_all(paths: &[PathBuf], ctx: &RenderContext<'_>) -> Result<Vec<Item>, BuildError> {
    let options = RenderOptions::default();
    let results: Vec<Result<Item, ArticleError>> = paths
        .par_iter()
        .map(|path| render_article(path, &options, ctx))
        .collect();

    let mut items = Vec::with_capacity(results.len());
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(item) => items.push(item),
            Err(source) => {
                return Err(BuildError::Article {
                    path: path.clone(),
                    source,
                });
            }
        }
    }
    Ok(items)
}

/// Newest first. Items with an unparseable publish date go last. Ties keep
/// their relative order.
pub fn sort_by_published(items: &mut [Item]) {
    items.sort_by_cached_key(|item| {
        let published = item.published();
        (published.is_none(), Reverse(published))
    });
}

fn export_all(
    root: &Path,
    items: &[Item],
    config: &BlogConfig,
    templates: &Templates,
    ctx: &RenderContext<'_>,
) -> Result<Vec<Artifact>, BuildError> {
    let results: Vec<(Exporter, Result<Vec<PathBuf>, ExportError>)> = Exporter::ALL
        .par_iter()
        .map(|&exporter| {
            let result = run_exporter(exporter, root, items, config, templates, ctx);
            (exporter, result)
        })
        .collect();

    let mut artifacts = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (exporter, result) in results {
        match result {
            Ok(paths) => {
                debug!("{} wrote {} files", exporter.name(), paths.len());
                artifacts.push(Artifact { exporter, paths });
            }
            Err(source) => {
                error!("{} export failed: {}", exporter.name(), source);
                first_error.get_or_insert(BuildError::Export { exporter, source });
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(artifacts),
    }
}

fn run_exporter(
    exporter: Exporter,
    root: &Path,
    items: &[Item],
    config: &BlogConfig,
    templates: &Templates,
    ctx: &RenderContext<'_>,
) -> Result<Vec<PathBuf>, ExportError> {
    match exporter {
        Exporter::Home => write_homepage(root, items.first(), templates.home(), ctx),
        Exporter::Archive => {
            let body = archive::archive_lines(items).join("\n");
            let page = ctx.page("Archive", String::new(), body);
            Ok(vec![templates.article.write_page(&page, &root.join(ARCHIVE_DIR))?])
        }
        Exporter::Tags => {
            let body = tags::tags_page_lines(items).join("\n");
            let page = ctx.page("Tags", String::new(), body);
            Ok(vec![templates.article.write_page(&page, &root.join(TAGS_DIR))?])
        }
        Exporter::JsonFeed => {
            let info = FeedInfo {
                title: &config.site.title,
                home_page_url: &config.site.url,
                base_url: ctx.base_url,
                path: &config.feed.json_path,
            };
            let pages = feed::paginate(items, config.feed.page_size, &info)?;
            Ok(feed::write_pages(&pages, root, &config.feed.json_path)?)
        }
        Exporter::LegacyFeeds => {
            let (atom, rss) = syndication::export_legacy_feeds(
                items,
                &config.site,
                root,
                &config.feed.atom_path,
                &config.feed.rss_path,
                ctx.now,
            )?;
            Ok(vec![atom, rss])
        }
    }
}

/// The latest article as the blog's front page, with a permalink.
fn write_homepage(
    root: &Path,
    latest: Option<&Item>,
    template: &PageTemplate,
    ctx: &RenderContext<'_>,
) -> Result<Vec<PathBuf>, ExportError> {
    let Some(latest) = latest else {
        return Ok(Vec::new());
    };
    let date = latest
        .published()
        .map(|p| dates::dual_date(&p))
        .unwrap_or_default();
    let body = format!("{}{}", latest.content_html, markup::permalink(&latest.url));
    let page = ctx.page(&latest.title, date, body);
    Ok(vec![template.write_page(&page, root)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::OUTPUT_PAGE;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn run(root: &Path) -> Result<BuildReport, BuildError> {
        let config = BlogConfig::default();
        let templates = Templates::from_config(root, &config.templates).unwrap();
        regenerate(root, &config, &templates, fixed_now())
    }

    // =========================================================================
    // sort_by_published
    // =========================================================================

    #[test]
    fn sort_newest_first() {
        let mut items = vec![
            make_item("Old", "2015-01-01T00:00:00Z", &[]),
            make_item("New", "2017-01-01T00:00:00Z", &[]),
            make_item("Mid", "2016-01-01T00:00:00Z", &[]),
        ];
        sort_by_published(&mut items);
        assert_eq!(item_titles(&items), vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn sort_is_stable_and_undated_last() {
        let mut items = vec![
            make_item("Broken", "garbage", &[]),
            make_item("TieA", "2016-01-01T00:00:00Z", &[]),
            make_item("Newest", "2017-01-01T00:00:00Z", &[]),
            make_item("TieB", "2016-01-01T01:00:00+01:00", &[]),
        ];
        sort_by_published(&mut items);
        assert_eq!(item_titles(&items), vec!["Newest", "TieA", "TieB", "Broken"]);
    }

    // =========================================================================
    // regenerate
    // =========================================================================

    #[test]
    fn regenerate_writes_every_artifact() {
        let blog = blog_fixture();
        let report = run(blog.path()).unwrap();

        assert_eq!(item_titles(&report.items), vec!["Second Post", "First Post"]);
        let root = &report.root;
        assert!(root.join(OUTPUT_PAGE).is_file());
        assert!(root.join(ARCHIVE_DIR).join(OUTPUT_PAGE).is_file());
        assert!(root.join(TAGS_DIR).join(OUTPUT_PAGE).is_file());
        assert!(root.join("feeds/json").is_file());
        assert!(root.join("feeds/atom").is_file());
        assert!(root.join("feeds/rss").is_file());

        let exporters: Vec<Exporter> = report.artifacts.iter().map(|a| a.exporter).collect();
        assert_eq!(exporters, Exporter::ALL);
    }

    #[test]
    fn homepage_is_latest_article_with_permalink() {
        let blog = blog_fixture();
        let report = run(blog.path()).unwrap();

        let home = fs::read_to_string(report.root.join(OUTPUT_PAGE)).unwrap();
        assert_eq!(home.lines().next(), Some("Second Post"));
        assert!(home.contains("<br /><a href=\"http://ratan.blog/second-post\">[Permalink]</a>"));
    }

    #[test]
    fn previous_titles_and_tags_carry_over() {
        let blog = blog_fixture();
        let report = run(blog.path()).unwrap();

        let first = find_item(&report.items, "First Post");
        assert_eq!(first.tags, vec!["rust", "meta"]);
        assert_eq!(first.url, "http://ratan.blog/first-post");
        assert_eq!(first.date_published, "2017-06-10T09:00:00Z");
        assert!(first.content_html.contains("<em>First Post</em>"));
    }

    #[test]
    fn list_pages_have_no_date() {
        let blog = blog_fixture();
        let report = run(blog.path()).unwrap();

        let archive = fs::read_to_string(report.root.join(ARCHIVE_DIR).join(OUTPUT_PAGE)).unwrap();
        let mut lines = archive.lines();
        assert_eq!(lines.next(), Some("Archive"));
        assert_eq!(lines.next(), Some(""));
        assert!(archive.contains("<h3>"));

        let tags = fs::read_to_string(report.root.join(TAGS_DIR).join(OUTPUT_PAGE)).unwrap();
        assert!(tags.starts_with("Tags\n"));
        assert!(tags.contains("<h3>Rust</h3>"));
    }

    #[test]
    fn drafts_are_ignored() {
        let blog = blog_fixture();
        let draft = blog.path().join("draft");
        fs::create_dir(&draft).unwrap();
        fs::write(draft.join("content.md"), "wip").unwrap();

        let report = run(blog.path()).unwrap();
        assert_eq!(report.items.len(), 2);
        assert!(!draft.join(OUTPUT_PAGE).exists());
    }

    #[test]
    fn failing_article_aborts_the_run() {
        let blog = blog_fixture();
        fs::remove_file(blog.path().join("first-post").join("content.md")).unwrap();

        let err = run(blog.path()).unwrap_err();
        match err {
            BuildError::Article { path, source } => {
                assert!(path.ends_with("first-post"));
                assert!(matches!(source, ArticleError::NoContent(_)));
            }
            other => panic!("expected article error, got {other}"),
        }
        // The healthy article was still rendered
        assert!(blog.path().join("second-post").join(OUTPUT_PAGE).is_file());
        assert!(!blog.path().join("feeds").exists());
    }

    #[test]
    fn failing_exporter_does_not_stop_the_others() {
        let blog = blog_fixture();
        // A file where the archive directory should be
        fs::write(blog.path().join(ARCHIVE_DIR), "in the way").unwrap();

        let err = run(blog.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Export {
                exporter: Exporter::Archive,
                ..
            }
        ));
        assert!(blog.path().join(TAGS_DIR).join(OUTPUT_PAGE).is_file());
        assert!(blog.path().join("feeds/json").is_file());
    }

    #[test]
    fn empty_blog_writes_feeds_but_no_homepage() {
        let tmp = TempDir::new().unwrap();
        write_test_template(tmp.path());

        let report = run(tmp.path()).unwrap();
        assert!(report.items.is_empty());
        assert!(!report.root.join(OUTPUT_PAGE).exists());
        let json = fs::read_to_string(report.root.join("feeds/json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["items"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn home_template_is_used_when_configured() {
        let blog = blog_fixture();
        fs::write(blog.path().join("home.html"), "HOME {{ title }}\n").unwrap();
        let mut config = BlogConfig::default();
        config.templates.home = Some(PathBuf::from("home.html"));

        let templates = Templates::from_config(blog.path(), &config.templates).unwrap();
        let report = regenerate(blog.path(), &config, &templates, fixed_now()).unwrap();
        let home = fs::read_to_string(report.root.join(OUTPUT_PAGE)).unwrap();
        assert_eq!(home, "HOME Second Post\n");
    }

    #[test]
    fn missing_template_is_reported() {
        let tmp = TempDir::new().unwrap();
        let result = Templates::from_config(tmp.path(), &TemplatesConfig::default());
        assert!(matches!(result, Err(TemplateError::Read { .. })));
    }
}
