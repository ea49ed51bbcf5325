//! Chunk construction.
//!
//! Pagination hands us ordered page texts; this module decides how a run
//! of pages becomes a single translation unit. Pages are joined with a
//! blank line either way; the builder only differs in whether page
//! boundaries are recorded as byte offsets (exact for the original text,
//! unrecoverable after translation) or as marker pairs (recoverable on
//! both sides as long as the engine keeps them).

use crate::chunk::{PageLayout, TranslationChunk};
use crate::config::TranslationConfig;
use crate::error::{ChunkError, ChunkResult, MarkerError};
use crate::marker::{self, MAX_PAGE_INDEX};
use crate::paragraph::PARAGRAPH_SEPARATOR;

/// Builds [`TranslationChunk`]s for one book and target language.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    book_id: String,
    target_language: String,
    use_markers: bool,
}

impl ChunkBuilder {
    /// Marker wrapping is the default; it is the only layout that stays
    /// exact for translated text.
    pub fn new(book_id: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            target_language: target_language.into(),
            use_markers: true,
        }
    }

    pub fn with_markers(mut self, use_markers: bool) -> Self {
        self.use_markers = use_markers;
        self
    }

    /// Builder for one book using the configured target language and
    /// layout choice.
    pub fn from_config(book_id: impl Into<String>, config: &TranslationConfig) -> Self {
        Self::new(book_id, config.target_language.clone()).with_markers(config.use_markers)
    }

    /// Join `pages` into one chunk whose first page has index
    /// `start_page`. Errors on an empty slice and, in the marked layout,
    /// on more pages than the codec can index.
    pub fn build(&self, start_page: usize, pages: &[String]) -> ChunkResult<TranslationChunk> {
        if pages.is_empty() {
            return Err(ChunkError::EmptyChunk);
        }
        let end_page = start_page + pages.len() - 1;

        let (original_text, layout) = if self.use_markers {
            (self.join_marked(pages)?, PageLayout::Marked)
        } else {
            let (text, offsets) = join_with_offsets(pages);
            (text, PageLayout::Offsets(offsets))
        };

        TranslationChunk::from_parts(
            self.book_id.clone(),
            start_page,
            end_page,
            self.target_language.clone(),
            original_text,
            layout,
        )
    }

    /// Plan and build chunks covering every page of a book.
    pub fn build_all(
        &self,
        pages: &[String],
        pages_per_chunk: usize,
    ) -> ChunkResult<Vec<TranslationChunk>> {
        plan_chunks(pages.len(), pages_per_chunk)
            .into_iter()
            .map(|(start, end)| self.build(start, &pages[start..=end]))
            .collect()
    }

    // Markers encode the index relative to the chunk's first page, so the
    // codec bound caps chunk size rather than book length.
    fn join_marked(&self, pages: &[String]) -> ChunkResult<String> {
        if pages.len() - 1 > MAX_PAGE_INDEX {
            return Err(MarkerError::IndexOutOfRange {
                index: pages.len() - 1,
                max: MAX_PAGE_INDEX,
            }
            .into());
        }
        let mut text = String::new();
        for (relative, page) in pages.iter().enumerate() {
            if relative > 0 {
                text.push_str(PARAGRAPH_SEPARATOR);
            }
            text.push_str(&marker::insert_markers(page, relative)?);
        }
        Ok(text)
    }
}

/// Inclusive `(start, end)` page ranges covering `0..page_count`, at most
/// `pages_per_chunk` pages each; the final range may run short.
pub fn plan_chunks(page_count: usize, pages_per_chunk: usize) -> Vec<(usize, usize)> {
    let step = pages_per_chunk.max(1);
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < page_count {
        let end = (start + step - 1).min(page_count - 1);
        ranges.push((start, end));
        start = end + 1;
    }
    ranges
}

fn join_with_offsets(pages: &[String]) -> (String, Vec<usize>) {
    let mut text = String::new();
    let mut offsets = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            text.push_str(PARAGRAPH_SEPARATOR);
        }
        text.push_str(page);
        offsets.push(text.len());
    }
    (text, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn offsets_mark_where_each_page_ends() {
        let (text, offsets) = join_with_offsets(&pages(&["ab", "cde", "f"]));
        assert_eq!(text, "ab\n\ncde\n\nf");
        assert_eq!(offsets, vec![2, 7, 10]);
    }

    #[test]
    fn offset_layout_round_trips_every_page() {
        let source = pages(&["one two", "", "three\nfour"]);
        let chunk = ChunkBuilder::new("b", "es")
            .with_markers(false)
            .build(10, &source)
            .unwrap();
        for (i, page) in source.iter().enumerate() {
            assert_eq!(&chunk.extract_original_page(10 + i).unwrap(), page);
        }
    }

    #[test]
    fn marked_layout_uses_chunk_relative_indices() {
        // Start page far beyond the codec's index bound still builds,
        // because markers are relative to the chunk.
        let chunk = ChunkBuilder::new("b", "es")
            .build(1000, &pages(&["a", "b"]))
            .unwrap();
        assert_eq!(chunk.extract_original_page(1000).unwrap(), "a");
        assert_eq!(chunk.extract_original_page(1001).unwrap(), "b");
    }

    #[test]
    fn rejects_empty_and_oversized_chunks() {
        let builder = ChunkBuilder::new("b", "es");
        assert!(matches!(builder.build(0, &[]), Err(ChunkError::EmptyChunk)));

        let too_many = vec![String::from("p"); MAX_PAGE_INDEX + 2];
        assert!(matches!(
            builder.build(0, &too_many),
            Err(ChunkError::Marker(MarkerError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn planning_covers_all_pages_with_a_short_tail() {
        assert_eq!(plan_chunks(7, 3), vec![(0, 2), (3, 5), (6, 6)]);
        assert_eq!(plan_chunks(3, 5), vec![(0, 2)]);
        assert_eq!(plan_chunks(0, 3), vec![]);
        // A zero step is clamped rather than looping forever.
        assert_eq!(plan_chunks(2, 0), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn config_drives_language_and_layout() {
        let config = TranslationConfig {
            target_language: "ja".to_string(),
            use_markers: false,
            ..TranslationConfig::default()
        };
        let chunk = ChunkBuilder::from_config("b", &config)
            .build(0, &pages(&["p"]))
            .unwrap();
        assert_eq!(chunk.chunk_id(), "b_0_0_ja");
        assert!(matches!(chunk.layout(), PageLayout::Offsets(_)));
    }

    #[test]
    fn build_all_produces_contiguous_chunks() {
        let source = pages(&["p0", "p1", "p2", "p3", "p4"]);
        let chunks = ChunkBuilder::new("b", "fr").build_all(&source, 2).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chunk_id(), "b_0_1_fr");
        assert_eq!(chunks[2].chunk_id(), "b_4_4_fr");
        assert_eq!(chunks[1].extract_original_page(3).unwrap(), "p3");
    }
}
