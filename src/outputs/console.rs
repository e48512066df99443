//! Console rendering for the digest.

use crate::utils::take_chars;
use std::io::{self, Write};

pub const SUMMARY_HEADING: &str = "— Summary (3 sentences) —";

/// Blank line, `=== Article i/N ===`, the URL, blank line.
pub fn write_article_header(
    out: &mut impl Write,
    index: usize,
    total: usize,
    url: &str,
) -> io::Result<()> {
    writeln!(out, "\n=== Article {index}/{total} ===\n{url}\n")
}

/// First `max_chars` characters of `text`, with `...` on its own line when cut.
pub fn write_preview(out: &mut impl Write, text: &str, max_chars: usize) -> io::Result<()> {
    let preview = take_chars(text, max_chars);
    let tail = if preview.len() < text.len() { "\n...\n" } else { "\n" };
    writeln!(out, "{preview}{tail}")
}

pub fn write_summary(out: &mut impl Write, summary: &str) -> io::Result<()> {
    writeln!(out, "{SUMMARY_HEADING}\n")?;
    writeln!(out, "{summary}\n")
}

pub fn write_warning(out: &mut impl Write, url: &str, error: &str) -> io::Result<()> {
    writeln!(out, "[warn] Failed {url}: {error}")
}
