//! Timestamp parsing and the dual-calendar date strings shown on pages.
//!
//! Items store their timestamps as RFC 3339 strings (second precision), which
//! is also the JSON Feed format. Pages display dates as
//! `<Tranquility date><br />[Gregorian: <Gregorian date>]`.

use crate::tranquility::TranquilDate;
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use std::time::SystemTime;

/// Gregorian long form, e.g. `Saturday, 10 June, 2017 CE`.
const GREGORIAN_LONG: &str = "%A, %-d %B, %Y CE";

pub fn parse_rfc3339(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
}

pub fn format_rfc3339(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The current instant in the local timezone.
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// A filesystem timestamp expressed in the local timezone.
pub fn from_system_time(time: SystemTime) -> DateTime<FixedOffset> {
    DateTime::<Local>::from(time).fixed_offset()
}

/// Tranquility long date with the era abbreviated, e.g. `Sunday, 17 Lavoisier, 48 AT`.
pub fn tranquil_date(ts: &DateTime<FixedOffset>) -> String {
    TranquilDate::from_date(ts.date_naive())
        .long_date()
        .replacen("After Tranquility", "AT", 1)
}

/// Both calendars for one instant, in the timezone the instant carries.
pub fn dual_date(ts: &DateTime<FixedOffset>) -> String {
    format!(
        "{}<br />[Gregorian: {}]",
        tranquil_date(ts),
        ts.format(GREGORIAN_LONG)
    )
}

pub fn today_string(now: &DateTime<FixedOffset>) -> String {
    format!("Today is {}", dual_date(now))
}
