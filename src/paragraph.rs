//! Blank-line paragraph splitting.
//!
//! The paragraph-count fallback in `chunk` needs both sides of a
//! translation split the same way, so the boundary definition lives here:
//! one or more newlines with any amount of interleaved whitespace counts as
//! a single paragraph break, which matches how pagination joins pages with
//! `"\n\n"`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used when page or paragraph text is joined back together.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split text into paragraphs on blank-line boundaries, dropping
/// whitespace-only segments.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    RE_PARAGRAPH_BREAK
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}

/// Number of non-blank paragraphs in `text`.
pub fn paragraph_count(text: &str) -> usize {
    split_paragraphs(text).len()
}
