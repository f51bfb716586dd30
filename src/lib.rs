//! # tqblog
//!
//! Regenerates a personal blog from a directory of article folders. Every
//! date on the site is shown in the Tranquility calendar, with the Gregorian
//! date alongside.
//!
//! # Architecture: Render, Then Export
//!
//! A blog root holds one folder per article. Each folder has a content
//! source and the `item.json` record left by its previous render:
//!
//! ```text
//! 1. Locate    root/          →  article folders   (folders with item.json)
//! 2. Render    folder         →  index.html + item.json, in parallel
//! 3. Sort      items          →  newest first
//! 4. Export    sorted items   →  homepage, archive, tags, JSON feed, Atom/RSS
//! ```
//!
//! Rendering one article is self-contained: it reads only its own folder and
//! writes only its own folder, so articles render concurrently on the rayon
//! pool. The exporters read the same sorted list and write disjoint paths, so
//! they run concurrently too.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds article folders and their attachment files |
//! | [`article`] | Renders one article folder into a page and an [`item::Item`] |
//! | [`regenerate`] | Renders every article and runs the exporters |
//! | [`feed`] | Splits items into linked JSON Feed pages |
//! | [`archive`] | Groups items into Tranquility month sections |
//! | [`tags`] | Groups items by tag |
//! | [`syndication`] | Atom and RSS documents |
//! | [`item`] | The persisted per-article record |
//! | [`template`] | Tera page templates |
//! | [`markup`] | Headings and link lines shared by the list pages |
//! | [`sniff`] | Attachment MIME detection from content |
//! | [`tranquility`] | Gregorian to Tranquility calendar conversion |
//! | [`dates`] | RFC 3339 timestamps and dual-calendar date strings |
//! | [`config`] | `config.toml` loading, stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Previous Render Is the Database
//!
//! There is no index file. An article exists when its folder holds an
//! `item.json`; that record keeps the title, tags and publish date across
//! renders. A folder without one is a draft and is ignored by regeneration
//! until it is rendered once on its own.
//!
//! ## User Templates, Built-In Markup
//!
//! Page chrome comes from a user-supplied Tera template so the site's look
//! lives with the content. The list markup inside the archive and tag pages
//! is generated with Maud so titles and URLs are always escaped.

pub mod archive;
pub mod article;
pub mod config;
pub mod dates;
pub mod feed;
pub mod item;
pub mod markup;
pub mod output;
pub mod regenerate;
pub mod scan;
pub mod sniff;
pub mod syndication;
pub mod tags;
pub mod template;
pub mod tranquility;

#[cfg(test)]
pub(crate) mod test_helpers;
