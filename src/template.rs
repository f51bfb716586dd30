//! Page templates.
//!
//! Every page the blog writes (articles, the homepage, the archive and tag
//! pages) goes through a user-supplied Tera template. The template sees:
//!
//! | Variable       | Content                                         |
//! |----------------|-------------------------------------------------|
//! | `title`        | Page title, HTML-escaped by the caller          |
//! | `date`         | Dual-calendar publish date (empty on list pages)|
//! | `today`        | `Today is <dual-calendar date>`                 |
//! | `content_html` | Rendered article body                           |
//! | `stylesheet`   | Configured stylesheet href, if any              |
//!
//! Autoescaping is off: `date`, `today` and `content_html` are markup.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

/// Name every rendered page is written under.
pub const OUTPUT_PAGE: &str = "index.html";

const TEMPLATE_NAME: &str = "page";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),
}

/// Data handed to a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    pub title: String,
    pub date: String,
    pub today: String,
    pub content_html: String,
    pub stylesheet: Option<String>,
}

/// A compiled page template, shared read-only between render workers.
#[derive(Debug)]
pub struct PageTemplate {
    tera: Tera,
}

impl PageTemplate {
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        tera.autoescape_on(vec![]);
        Ok(Self { tera })
    }

    pub fn render(&self, page: &PageContext) -> Result<String, TemplateError> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// Render into `<dir>/index.html`, creating `dir` if needed.
    pub fn write_page(&self, page: &PageContext, dir: &Path) -> Result<PathBuf, TemplateError> {
        let html = self.render(page)?;
        fs::create_dir_all(dir)?;
        let out = dir.join(OUTPUT_PAGE);
        fs::write(&out, html)?;
        Ok(out)
    }
}
