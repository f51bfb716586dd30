//! MIME type detection from the first bytes of a file.
//!
//! Markup is checked first: leading whitespace is skipped, then a handful of
//! HTML tags and the XML declaration are matched case-insensitively. Binary
//! formats are recognised by signature through `infer`. Anything left without
//! binary control bytes is plain text.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read from the start of a file for detection.
pub const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";
const TEXT_XML: &str = "text/xml; charset=utf-8";

const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Detect the MIME type of `data`, looking at no more than [`SNIFF_LEN`] bytes.
pub fn sniff(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let trimmed = trim_leading_whitespace(data);
    if HTML_TAGS.iter().any(|tag| is_tag(trimmed, tag)) {
        return TEXT_HTML;
    }
    if trimmed.starts_with(b"<?xml") {
        return TEXT_XML;
    }
    if let Some(kind) = infer::get(data) {
        return kind.mime_type();
    }
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) || !data.iter().copied().any(is_binary_byte) {
        return TEXT_PLAIN;
    }
    OCTET_STREAM
}

/// Read the first [`SNIFF_LEN`] bytes of `path` and detect its MIME type.
pub fn sniff_file(path: &Path) -> io::Result<&'static str> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut prefix)?;
    Ok(sniff(&prefix))
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

/// Case-insensitive tag match that must be followed by a space or `>`.
fn is_tag(data: &[u8], tag: &[u8]) -> bool {
    data.len() > tag.len()
        && data[..tag.len()].eq_ignore_ascii_case(tag)
        && matches!(data[tag.len()], b' ' | b'>')
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
