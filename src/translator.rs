//! The seam to the external translation engine.
//!
//! The core performs no I/O of its own; whatever actually talks to
//! LibreTranslate, an on-device model, or anything else implements
//! [`Translator`]. The only expectation placed on an engine is best
//! effort: ideally it preserves our marker characters, failing that the
//! blank-line paragraph structure. Scheduling, timeouts, retries, and
//! cancellation all belong to the caller.

use std::time::Instant;

use tracing::{debug, info};

use crate::chunk::TranslationChunk;
use crate::error::{ChunkError, ChunkResult};

/// An opaque text-to-text translation engine.
pub trait Translator {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
    -> anyhow::Result<String>;
}

/// Send a chunk's original text through `translator` as one unit and
/// return the translated chunk.
///
/// An already-translated chunk is returned as-is; building a chunk for a
/// different language is the way to force a fresh translation. Engine
/// failures surface as [`ChunkError::Translation`] and are not retried
/// here.
pub fn translate_chunk<T: Translator + ?Sized>(
    chunk: &TranslationChunk,
    translator: &T,
    source_lang: &str,
) -> ChunkResult<TranslationChunk> {
    if chunk.is_translated() {
        debug!(chunk_id = %chunk.chunk_id(), "chunk already translated, skipping engine call");
        return Ok(chunk.clone());
    }

    let started = Instant::now();
    let translated = translator
        .translate(chunk.original_text(), source_lang, chunk.target_language())
        .map_err(|err| ChunkError::Translation(format!("{err:#}")))?;

    info!(
        chunk_id = %chunk.chunk_id(),
        chars = chunk.original_text().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "translated chunk"
    );
    Ok(chunk.with_translation(translated))
}
