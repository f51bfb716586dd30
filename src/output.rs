//! CLI output formatting for the `article` and `update` commands.
//!
//! # Information-First Display
//!
//! Articles are listed by title and position in the newest-first order, with
//! their dates in the Tranquility calendar. Derived outputs are listed by
//! exporter with the files they wrote, relative to the blog root.
//!
//! # Output Format
//!
//! ## Article
//!
//! ```text
//! First Post
//!     URL: http://ratan.blog/first-post
//!     Published: Sunday, 17 Lavoisier, 48 AT
//!     Tags: rust, meta
//!     001 image/png → http://ratan.blog/first-post/attachments/map.png
//! ```
//!
//! ## Update
//!
//! ```text
//! Articles
//! 001 Second Post
//!     Published: Tuesday, 19 Lavoisier, 48 AT
//!     Tags: rust
//! 002 First Post
//!     Published: Sunday, 17 Lavoisier, 48 AT
//!     Tags: rust, meta
//!
//! Home → index.html
//! Archive → archive/index.html
//! Tags → tags/index.html
//! JSON feed → feeds/json
//! Atom/RSS → feeds/atom, feeds/rss
//!
//! Regenerated 2 articles
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::dates;
use crate::item::Item;
use crate::regenerate::{Artifact, BuildReport, Exporter};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Date lines for one item. Modified is shown only when it differs.
fn date_lines(item: &Item, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = Vec::new();
    match item.published() {
        Some(p) => lines.push(format!("{}Published: {}", pad, dates::tranquil_date(&p))),
        None => lines.push(format!("{}Published: ({})", pad, item.date_published)),
    }
    if let Some(m) = item.modified()
        && Some(m) != item.published()
    {
        lines.push(format!("{}Modified: {}", pad, dates::tranquil_date(&m)));
    }
    lines
}

fn tag_line(item: &Item, depth: usize) -> Option<String> {
    (!item.tags.is_empty()).then(|| format!("{}Tags: {}", indent(depth), item.tags.join(", ")))
}

// ============================================================================
// Article
// ============================================================================

/// Format a single rendered article.
pub fn format_article_output(item: &Item) -> Vec<String> {
    let mut lines = vec![item.title.clone(), format!("{}URL: {}", indent(1), item.url)];
    lines.extend(date_lines(item, 1));
    lines.extend(tag_line(item, 1));
    for (i, attachment) in item.attachments.iter().enumerate() {
        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(1),
            format_index(i + 1),
            attachment.mime_type,
            attachment.url
        ));
    }
    lines
}

pub fn print_article_output(item: &Item) {
    for line in format_article_output(item) {
        println!("{}", line);
    }
}

// ============================================================================
// Update
// ============================================================================

fn artifact_line(artifact: &Artifact, root: &Path) -> String {
    let name = artifact.exporter.name();
    match (artifact.exporter, artifact.paths.as_slice()) {
        (Exporter::Home, []) => format!("{} \u{2192} (no articles)", name),
        (Exporter::JsonFeed, [first, rest @ ..]) if !rest.is_empty() => format!(
            "{} \u{2192} {} (+{})",
            name,
            relative(first, root),
            plural(rest.len(), "page")
        ),
        (_, paths) => {
            let paths: Vec<String> = paths.iter().map(|p| relative(p, root)).collect();
            format!("{} \u{2192} {}", name, paths.join(", "))
        }
    }
}

/// Format the result of a full regeneration.
pub fn format_update_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.items.is_empty() {
        lines.push("Articles".to_string());
        for (i, item) in report.items.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), item.title));
            lines.extend(date_lines(item, 1));
            lines.extend(tag_line(item, 1));
        }
        lines.push(String::new());
    }

    for artifact in &report.artifacts {
        lines.push(artifact_line(artifact, &report.root));
    }

    lines.push(String::new());
    lines.push(format!("Regenerated {}", plural(report.items.len(), "article")));
    lines
}

pub fn print_update_output(report: &BuildReport) {
    for line in format_update_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
