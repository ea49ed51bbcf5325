//! Translation chunks.
//!
//! A chunk batches a run of consecutive pages so the translation engine
//! sees them as one document (context across page boundaries markedly
//! improves quality), then answers per-page lookups against both the
//! original and the translated text.
//!
//! Recovering page boundaries from translated text is the interesting
//! part: translation preserves neither character offsets nor lengths. The
//! chunk records how its original text was laid out (`PageLayout`) and
//! picks the extraction strategy per page at read time — exact marker
//! lookup when the engine passed our private-use characters through,
//! paragraph counting when it did not.

use std::time::SystemTime;

use tracing::{debug, warn};

use crate::error::{ChunkError, ChunkResult};
use crate::marker;
use crate::paragraph::{self, PARAGRAPH_SEPARATOR};

/// How a chunk's original text encodes its page boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLayout {
    /// Every page is wrapped in a marker pair; boundaries are recovered by
    /// marker lookup and survive translation when the engine keeps PUA
    /// characters intact.
    Marked,
    /// Pages are joined with a blank line; the byte offset where each
    /// page's content ends is recorded at build time. Exact for the
    /// original text only.
    Offsets(Vec<usize>),
}

/// One batched translation unit spanning `start_page..=end_page`.
///
/// Chunks are immutable values: recording a completed translation returns
/// a new chunk via [`TranslationChunk::with_translation`] and leaves the
/// receiver untouched. Re-translating into another language is a new chunk
/// with a different `target_language`, never a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationChunk {
    book_id: String,
    start_page: usize,
    end_page: usize,
    target_language: String,
    original_text: String,
    layout: PageLayout,
    translated_text: Option<String>,
    translated_at: Option<SystemTime>,
}

impl TranslationChunk {
    /// Assemble a chunk from already-joined text. `builder` is the public
    /// entry point; this validates the invariants that extraction relies
    /// on.
    pub(crate) fn from_parts(
        book_id: String,
        start_page: usize,
        end_page: usize,
        target_language: String,
        original_text: String,
        layout: PageLayout,
    ) -> ChunkResult<Self> {
        if start_page > end_page {
            return Err(ChunkError::InvalidRange {
                start: start_page,
                end: end_page,
            });
        }
        let page_count = end_page - start_page + 1;
        if let PageLayout::Offsets(offsets) = &layout {
            if offsets.len() != page_count {
                return Err(ChunkError::OffsetCountMismatch {
                    expected: page_count,
                    got: offsets.len(),
                });
            }
        }
        Ok(Self {
            book_id,
            start_page,
            end_page,
            target_language,
            original_text,
            layout,
            translated_text: None,
            translated_at: None,
        })
    }

    /// Deterministic cache identity: book, inclusive page range, target
    /// language.
    pub fn chunk_id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.book_id, self.start_page, self.end_page, self.target_language
        )
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn start_page(&self) -> usize {
        self.start_page
    }

    pub fn end_page(&self) -> usize {
        self.end_page
    }

    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page + 1
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.translated_text.as_deref()
    }

    pub fn translated_at(&self) -> Option<SystemTime> {
        self.translated_at
    }

    pub fn is_translated(&self) -> bool {
        self.translated_text.is_some()
    }

    /// Record a completed translation, returning the translated chunk.
    pub fn with_translation(&self, translated_text: String) -> Self {
        Self {
            translated_text: Some(translated_text),
            translated_at: Some(SystemTime::now()),
            ..self.clone()
        }
    }

    /// The original text of one page, markers stripped. Always succeeds
    /// for an in-range index.
    pub fn extract_original_page(&self, page_index: usize) -> ChunkResult<String> {
        self.check_range(page_index)?;
        let relative = page_index - self.start_page;
        match &self.layout {
            PageLayout::Offsets(offsets) => {
                let start = if relative == 0 {
                    0
                } else {
                    offsets[relative - 1] + PARAGRAPH_SEPARATOR.len()
                };
                let end = offsets[relative];
                Ok(self.original_text[start..end].to_string())
            }
            PageLayout::Marked => {
                let span = marker::extract_page(&self.original_text, relative)?;
                Ok(marker::strip_markers(&span))
            }
        }
    }

    /// The translated text of one page, markers stripped.
    ///
    /// Errors only on caller misuse: reading before translation completed,
    /// or an out-of-range index. Marker loss and paragraph drift are
    /// expected runtime conditions and degrade to partial or empty text.
    pub fn extract_translated_page(&self, page_index: usize) -> ChunkResult<String> {
        let translated = self
            .translated_text
            .as_deref()
            .ok_or_else(|| ChunkError::NotTranslated {
                chunk_id: self.chunk_id(),
            })?;
        self.check_range(page_index)?;
        let relative = page_index - self.start_page;

        if self.layout == PageLayout::Marked && marker::has_page_marker(translated, relative)? {
            let span = marker::extract_page(translated, relative)?;
            return Ok(marker::strip_markers(&span));
        }

        if self.layout == PageLayout::Marked {
            debug!(
                chunk_id = %self.chunk_id(),
                page_index,
                "page marker did not survive translation, using paragraph counts"
            );
        }
        self.translated_page_by_paragraphs(page_index, translated)
    }

    /// Paragraph-count fallback: assume the engine kept blank-line
    /// paragraphs 1:1 and in order, and carve the translated text into the
    /// same per-page paragraph counts as the original.
    fn translated_page_by_paragraphs(
        &self,
        page_index: usize,
        translated: &str,
    ) -> ChunkResult<String> {
        let plain = marker::strip_markers(translated);
        let translated_paragraphs = paragraph::split_paragraphs(&plain);

        let mut skip = 0;
        for preceding in self.start_page..page_index {
            skip += paragraph::paragraph_count(&self.extract_original_page(preceding)?);
        }
        let wanted = paragraph::paragraph_count(&self.extract_original_page(page_index)?);

        if skip >= translated_paragraphs.len() {
            warn!(
                chunk_id = %self.chunk_id(),
                page_index,
                translated_paragraphs = translated_paragraphs.len(),
                needed_offset = skip,
                "translated text has too few paragraphs, returning empty page"
            );
            return Ok(String::new());
        }

        let end = (skip + wanted).min(translated_paragraphs.len());
        if end < skip + wanted {
            warn!(
                chunk_id = %self.chunk_id(),
                page_index,
                wanted,
                available = end - skip,
                "translated paragraph count fell short, returning truncated page"
            );
        }
        Ok(translated_paragraphs[skip..end].join(PARAGRAPH_SEPARATOR))
    }

    fn check_range(&self, page_index: usize) -> ChunkResult<()> {
        if page_index < self.start_page || page_index > self.end_page {
            return Err(ChunkError::PageOutOfRange {
                index: page_index,
                start: self.start_page,
                end: self.end_page,
            });
        }
        Ok(())
    }
}
