//! Article discovery.
//!
//! A blog root looks like this:
//!
//! ```text
//! blog/
//! ├── config.toml                 # Optional configuration
//! ├── template.html               # Page template
//! ├── first-post/
//! │   ├── content.md              # Preferred content source
//! │   ├── item.json               # Written on first render
//! │   ├── index.html              # Rendered page
//! │   └── attachments/
//! │       └── diagram.png
//! ├── draft/                      # No item.json yet: not picked up
//! │   └── content.md
//! ├── archive/                    # Generated
//! ├── tags/                       # Generated
//! └── feeds/                      # Generated
//! ```
//!
//! Only immediate subdirectories holding an `item.json` are articles. A draft
//! becomes part of the blog once it has been rendered once with
//! `tqblog article`.

use crate::item::{ATTACHMENT_DIR, ITEM_FILE};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Article directories directly under `root`, sorted by path.
///
/// An unreadable root is an error. Subdirectories without an `item.json`
/// are skipped.
pub fn find_article_paths(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        // `Path::is_dir` follows links, so symlinked article folders count
        if entry.path().is_dir() && entry.path().join(ITEM_FILE).is_file() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Regular files in `<article>/attachments`, in filename order.
///
/// A missing attachments directory means no attachments.
pub fn attachment_paths(article: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let dir = article.join(ATTACHMENT_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: dir.clone(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
