//! Line-oriented markup for the archive and tag pages, plus the homepage permalink.
//!
//! Both pages are a sequence of sections, each a heading followed by a list of
//! article links, emitted one element per line:
//!
//! ```html
//! <h3>Mendel, 48 AT</h3>
//! <ul>
//! <li><a href="http://ratan.blog/first-post">First Post</a></li>
//! </ul>
//! ```

use crate::item::Item;
use maud::html;

pub const LIST_OPEN: &str = "<ul>";
pub const LIST_CLOSE: &str = "</ul>";

pub fn heading(text: &str) -> String {
    html! { h3 { (text) } }.into_string()
}

pub fn link(item: &Item) -> String {
    html! {
        li { a href=(item.url) { (item.title) } }
    }
    .into_string()
}

/// Link back to an article, appended to the homepage body.
pub fn permalink(url: &str) -> String {
    format!("<br />{}", html! { a href=(url) { "[Permalink]" } }.into_string())
}

/// A complete section: heading, list open, one link per item, list close.
pub fn section<'a>(title: &str, items: impl IntoIterator<Item = &'a Item>) -> Vec<String> {
    let mut lines = vec![heading(title), LIST_OPEN.to_string()];
    lines.extend(items.into_iter().map(link));
    lines.push(LIST_CLOSE.to_string());
    lines
}
