//! Invisible page-boundary markers.
//!
//! Each page in a chunk is wrapped in a pair of Unicode private-use-area
//! code points that encode the page index: `U+E000 + index` opens a page
//! and `U+E100 + index` closes it. PUA characters carry no linguistic
//! content, so a translation engine has nothing to translate, reorder, or
//! inflect in them; most engines pass them through verbatim, which lets us
//! find the original page boundaries inside the translated text.
//!
//! Everything here is a pure function over `&str`; there is no state to
//! share or lock.

use crate::error::MarkerError;

/// First code point of the start-marker range.
const START_BASE: u32 = 0xE000;
/// First code point of the end-marker range.
const END_BASE: u32 = 0xE100;

/// Highest page index the codec can encode. The two marker ranges occupy
/// `U+E000..=U+E0FF` and `U+E100..=U+E1FF`, comfortably inside the BMP
/// private use area (`U+E000..=U+F8FF`), giving 256 markable pages per
/// chunk.
pub const MAX_PAGE_INDEX: usize = 0xFF;

fn start_marker(page_index: usize) -> Result<char, MarkerError> {
    check_index(page_index)?;
    // Safe: START_BASE + 0..=255 stays inside the PUA, always a valid char.
    Ok(char::from_u32(START_BASE + page_index as u32).unwrap())
}

fn end_marker(page_index: usize) -> Result<char, MarkerError> {
    check_index(page_index)?;
    Ok(char::from_u32(END_BASE + page_index as u32).unwrap())
}

fn check_index(page_index: usize) -> Result<(), MarkerError> {
    if page_index > MAX_PAGE_INDEX {
        return Err(MarkerError::IndexOutOfRange {
            index: page_index,
            max: MAX_PAGE_INDEX,
        });
    }
    Ok(())
}

fn is_start_marker(ch: char) -> bool {
    (START_BASE..START_BASE + 0x100).contains(&(ch as u32))
}

fn is_end_marker(ch: char) -> bool {
    (END_BASE..END_BASE + 0x100).contains(&(ch as u32))
}

fn is_marker(ch: char) -> bool {
    is_start_marker(ch) || is_end_marker(ch)
}

/// Wrap `text` in the marker pair for `page_index`.
///
/// Empty text is valid and produces just the two markers back to back.
pub fn insert_markers(text: &str, page_index: usize) -> Result<String, MarkerError> {
    let start = start_marker(page_index)?;
    let end = end_marker(page_index)?;
    let mut marked = String::with_capacity(text.len() + start.len_utf8() + end.len_utf8());
    marked.push(start);
    marked.push_str(text);
    marked.push(end);
    Ok(marked)
}

/// Recover the span tagged with `page_index` from marked (possibly
/// translated) text.
///
/// A missing start marker yields `Ok("")`: translation engines sometimes
/// drop PUA characters and that must not abort rendering. A found start
/// marker with no matching end marker yields everything after the start
/// marker as a best-effort remainder. Only an out-of-range index is an
/// error.
pub fn extract_page(marked: &str, page_index: usize) -> Result<String, MarkerError> {
    let start = start_marker(page_index)?;
    let end = end_marker(page_index)?;

    let Some(pos) = marked.find(start) else {
        return Ok(String::new());
    };
    let after_start = &marked[pos + start.len_utf8()..];

    let span = match after_start.find(end) {
        Some(end_pos) => &after_start[..end_pos],
        None => after_start,
    };
    Ok(span.to_string())
}

/// Remove every marker character, paired or stray. Text without markers
/// comes back unchanged.
pub fn strip_markers(text: &str) -> String {
    if !text.chars().any(is_marker) {
        return text.to_string();
    }
    text.chars().filter(|&ch| !is_marker(ch)).collect()
}

/// Whether any start marker is present in `text`.
pub fn has_markers(text: &str) -> bool {
    text.chars().any(is_start_marker)
}

/// Whether the start marker for one specific page survived in `text`.
pub fn has_page_marker(text: &str, page_index: usize) -> Result<bool, MarkerError> {
    let start = start_marker(page_index)?;
    Ok(text.contains(start))
}

/// All page indices whose start marker appears in `text`, sorted and
/// deduplicated. Indices need not be consecutive; a chunk may carry any
/// subset of `0..=MAX_PAGE_INDEX`.
pub fn marked_page_indices(text: &str) -> Vec<usize> {
    let mut indices: Vec<usize> = text
        .chars()
        .filter(|&ch| is_start_marker(ch))
        .map(|ch| (ch as u32 - START_BASE) as usize)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Number of distinct pages with a surviving start marker.
pub fn count_marked_pages(text: &str) -> usize {
    marked_page_indices(text).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plain_text() {
        let marked = insert_markers("The quick brown fox.", 0).unwrap();
        assert_eq!(extract_page(&marked, 0).unwrap(), "The quick brown fox.");
    }

    #[test]
    fn round_trips_empty_multiline_and_unicode() {
        for text in ["", "line one\n\nline two\nline three", "día — 翻訳 🙂"] {
            let marked = insert_markers(text, 42).unwrap();
            assert_eq!(extract_page(&marked, 42).unwrap(), text);
            assert_eq!(strip_markers(&marked), text);
        }
    }

    #[test]
    fn strip_is_idempotent() {
        let marked = insert_markers("some text", 7).unwrap();
        let once = strip_markers(&marked);
        assert_eq!(strip_markers(&once), once);
        assert_eq!(strip_markers("no markers here"), "no markers here");
    }

    #[test]
    fn rejects_indices_beyond_the_supported_range() {
        let err = insert_markers("text", MAX_PAGE_INDEX + 1).unwrap_err();
        assert_eq!(
            err,
            MarkerError::IndexOutOfRange {
                index: MAX_PAGE_INDEX + 1,
                max: MAX_PAGE_INDEX
            }
        );
        assert!(extract_page("text", usize::MAX).is_err());
        assert!(insert_markers("text", MAX_PAGE_INDEX).is_ok());
    }

    #[test]
    fn missing_start_marker_yields_empty_not_error() {
        assert_eq!(extract_page("completely plain text", 3).unwrap(), "");
    }

    #[test]
    fn missing_end_marker_yields_best_effort_remainder() {
        let marked = insert_markers("kept content", 5).unwrap();
        // Simulate the engine truncating the closing marker.
        let truncated: String = marked
            .chars()
            .filter(|&ch| !is_end_marker(ch))
            .collect();
        assert_eq!(extract_page(&truncated, 5).unwrap(), "kept content");
    }

    #[test]
    fn scans_non_consecutive_page_indices() {
        let mut text = String::new();
        for (index, body) in [(1usize, "one"), (4, "four"), (9, "nine")] {
            text.push_str(&insert_markers(body, index).unwrap());
            text.push_str("\n\n");
        }
        assert!(has_markers(&text));
        assert_eq!(marked_page_indices(&text), vec![1, 4, 9]);
        assert_eq!(count_marked_pages(&text), 3);
        assert!(has_page_marker(&text, 4).unwrap());
        assert!(!has_page_marker(&text, 2).unwrap());
    }

    #[test]
    fn empty_input_produces_only_the_marker_pair() {
        let marked = insert_markers("", 0).unwrap();
        assert_eq!(marked.chars().count(), 2);
        assert_eq!(strip_markers(&marked), "");
    }
}
