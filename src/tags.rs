//! Tag index page.
//!
//! Tags are listed alphabetically (ignoring case), each with the articles
//! carrying it in the order they were given, newest first after sorting.

use crate::item::Item;
use crate::markup;
use std::collections::HashMap;

/// Items grouped by tag, plus the distinct non-empty tags in display order.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    pub by_tag: HashMap<&'a str, Vec<&'a Item>>,
    pub tags: Vec<&'a str>,
}

/// Group `items` by tag. An item tagged twice with the same tag is listed once.
pub fn tag_index(items: &[Item]) -> TagIndex<'_> {
    let mut index = TagIndex::default();
    for item in items {
        for tag in item.tags.iter().map(String::as_str) {
            if tag.is_empty() {
                continue;
            }
            let bucket = index.by_tag.entry(tag).or_default();
            if bucket.is_empty() {
                index.tags.push(tag);
            }
            if !bucket.iter().any(|listed| std::ptr::eq(*listed, item)) {
                bucket.push(item);
            }
        }
    }
    index
        .tags
        .sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    index
}

/// Tags page body, one markup element per line.
pub fn tags_page_lines(items: &[Item]) -> Vec<String> {
    let index = tag_index(items);
    index
        .tags
        .iter()
        .flat_map(|tag| {
            let tagged = index.by_tag.get(tag).into_iter().flatten().copied();
            markup::section(&title_case(tag), tagged)
        })
        .collect()
}

/// Capitalise the first letter of every word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_' || c == '\'');
    }
    out
}
