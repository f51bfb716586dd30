//! Legacy syndication: Atom 1.0 and RSS 2.0.
//!
//! Both documents carry every item, newest first, with the rendered HTML as
//! the entry body. They are written to `feed.atom_path` and `feed.rss_path`.

use crate::config::SiteConfig;
use crate::item::Item;
use atom_syndication as atom;
use chrono::{DateTime, FixedOffset};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyndicationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RSS error: {0}")]
    Rss(#[from] rss::Error),
    #[error("Atom error: {0}")]
    Atom(#[from] atom::Error),
}

pub fn rss_channel(items: &[Item], site: &SiteConfig, now: DateTime<FixedOffset>) -> rss::Channel {
    let mut channel = rss::Channel::default();
    channel.set_title(site.title.clone());
    channel.set_link(site.url.clone());
    channel.set_description(site.title.clone());
    channel.set_last_build_date(now.to_rfc2822());
    channel.set_items(items.iter().map(rss_item).collect::<Vec<_>>());
    channel
}

fn rss_item(item: &Item) -> rss::Item {
    let mut guid = rss::Guid::default();
    guid.set_value(item.id.clone());
    guid.set_permalink(true);

    let mut entry = rss::Item::default();
    entry.set_title(item.title.clone());
    entry.set_link(item.url.clone());
    entry.set_guid(guid);
    entry.set_description(item.content_html.clone());
    entry.set_pub_date(item.published().map(|p| p.to_rfc2822()));
    entry
}

pub fn atom_feed(items: &[Item], site: &SiteConfig, now: DateTime<FixedOffset>) -> atom::Feed {
    let mut feed = atom::Feed::default();
    feed.set_title(site.title.clone());
    feed.set_id(site.url.clone());
    feed.set_updated(now);
    feed.set_links(vec![alternate_link(&site.url)]);
    feed.set_entries(
        items
            .iter()
            .map(|item| atom_entry(item, now))
            .collect::<Vec<_>>(),
    );
    feed
}

fn atom_entry(item: &Item, now: DateTime<FixedOffset>) -> atom::Entry {
    let published = item.published();
    let updated = item.modified().or(published).unwrap_or(now);

    let mut content = atom::Content::default();
    content.set_content_type(Some("html".to_string()));
    content.set_value(Some(item.content_html.clone()));

    let mut entry = atom::Entry::default();
    entry.set_title(item.title.clone());
    entry.set_id(item.id.clone());
    entry.set_links(vec![alternate_link(&item.url)]);
    entry.set_published(published);
    entry.set_updated(updated);
    entry.set_content(Some(content));
    entry
}

fn alternate_link(href: &str) -> atom::Link {
    let mut link = atom::Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

fn create(path: &Path) -> Result<BufWriter<File>, std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write both legacy feeds under `root`. Returns `(atom, rss)` paths.
pub fn export_legacy_feeds(
    items: &[Item],
    site: &SiteConfig,
    root: &Path,
    atom_path: &str,
    rss_path: &str,
    now: DateTime<FixedOffset>,
) -> Result<(PathBuf, PathBuf), SyndicationError> {
    let atom_out = root.join(atom_path);
    atom_feed(items, site, now)
        .write_to(create(&atom_out)?)?
        .flush()?;

    let rss_out = root.join(rss_path);
    rss_channel(items, site, now)
        .write_to(create(&rss_out)?)?
        .flush()?;

    Ok((atom_out, rss_out))
}
