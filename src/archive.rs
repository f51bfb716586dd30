//! Chronological archive, sectioned by Tranquility month.
//!
//! Items arrive newest first. A new section starts whenever the Tranquility
//! year or month changes between neighbours, and on every change of special
//! day. Hippocrates and Aldrin Day share one section: Aldrin Day falls between
//! Hippocrates 27 and 28, so splitting them would cut the month in two.
//!
//! Section headings:
//!
//! | Date                          | Heading                            |
//! |-------------------------------|------------------------------------|
//! | Hippocrates or Aldrin Day     | `Hippocrates & Aldrin Day, 3 AT`   |
//! | Armstrong / Moon Landing Day  | `Armstrong Day, 3 AT`              |
//! | Any other month               | `Mendel, 3 AT`                     |
//!
//! Items without a parseable publish date are listed last under `Undated`.

use crate::item::Item;
use crate::markup::{self, LIST_CLOSE, LIST_OPEN};
use crate::tranquility::{Month, SpecialDay, TranquilDate};

pub const UNDATED_HEADING: &str = "Undated";

/// Whether `current` opens a new section after `previous`, and the heading
/// that section gets.
///
/// `previous` is `None` before the first item, which always opens a section.
pub fn section_break(previous: Option<&TranquilDate>, current: &TranquilDate) -> (bool, String) {
    if is_hippocrates_or_aldrin(current) {
        let heading = format!("Hippocrates & Aldrin Day, {}", current.era());
        let same_span =
            previous.is_some_and(|p| is_hippocrates_or_aldrin(p) && p.year == current.year);
        return (!same_span, heading);
    }

    let heading = match current.special() {
        Some(special) => format!("{}, {}", special, current.era()),
        None => format!("{}, {}", month_name(current), current.era()),
    };
    let needs_break = match previous {
        None => true,
        Some(p) => {
            p.year != current.year
                || p.month() != current.month()
                || (current.is_special() && p.day != current.day)
        }
    };
    (needs_break, heading)
}

fn is_hippocrates_or_aldrin(date: &TranquilDate) -> bool {
    date.month() == Some(Month::Hippocrates) || date.special() == Some(SpecialDay::AldrinDay)
}

fn month_name(date: &TranquilDate) -> &'static str {
    date.month().map(Month::name).unwrap_or_default()
}

/// Archive page body, one markup element per line.
pub fn archive_lines(items: &[Item]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut undated = Vec::new();
    let mut previous: Option<TranquilDate> = None;

    for item in items {
        let Some(published) = item.published() else {
            undated.push(item);
            continue;
        };
        let current = TranquilDate::from_date(published.date_naive());
        let (needs_break, heading) = section_break(previous.as_ref(), &current);
        if needs_break {
            if previous.is_some() {
                lines.push(LIST_CLOSE.to_string());
            }
            lines.push(markup::heading(&heading));
            lines.push(LIST_OPEN.to_string());
        }
        lines.push(markup::link(item));
        previous = Some(current);
    }
    if previous.is_some() {
        lines.push(LIST_CLOSE.to_string());
    }

    if !undated.is_empty() {
        lines.extend(markup::section(UNDATED_HEADING, undated));
    }
    lines
}
