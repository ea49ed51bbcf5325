//! In-memory chunk store.
//!
//! Chunks are keyed by their deterministic `chunk_id`, so a second request
//! for the same book range and language finds the finished translation
//! instead of hitting the engine again. The store is insertion-order
//! bounded; persistence and cross-request coalescing for concurrent
//! callers stay outside the core.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::chunk::TranslationChunk;
use crate::error::ChunkResult;
use crate::translator::{Translator, translate_chunk};

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct ChunkStore {
    entries: HashMap<String, TranslationChunk>,
    // Oldest chunk id first; drives eviction when capacity is reached.
    order: VecDeque<String>,
    capacity: usize,
}

impl ChunkStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, chunk_id: &str) -> Option<&TranslationChunk> {
        self.entries.get(chunk_id)
    }

    /// Store a chunk under its own id, evicting the oldest entry when the
    /// store is full. Re-inserting an existing id replaces the chunk
    /// without touching its age.
    pub fn insert(&mut self, chunk: TranslationChunk) {
        let id = chunk.chunk_id();
        if self.entries.insert(id.clone(), chunk).is_some() {
            return;
        }
        self.order.push_back(id);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                debug!(chunk_id = %oldest, "evicting oldest cached chunk");
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn remove(&mut self, chunk_id: &str) -> Option<TranslationChunk> {
        self.order.retain(|id| id != chunk_id);
        self.entries.remove(chunk_id)
    }

    /// Drop every cached chunk belonging to one book. Used when the book
    /// closes or the reader switches target language (which builds new
    /// chunks under new ids anyway, but keeps the stale ones from
    /// occupying capacity).
    pub fn evict_book(&mut self, book_id: &str) {
        let before = self.entries.len();
        self.entries.retain(|_, chunk| chunk.book_id() != book_id);
        self.order.retain(|id| self.entries.contains_key(id));
        debug!(
            book_id,
            evicted = before - self.entries.len(),
            "evicted book chunks"
        );
    }

    /// Read-through lookup: return the cached translated chunk if present,
    /// otherwise translate `chunk`, cache it, and return it. Sequential
    /// callers therefore pay for at most one engine call per chunk id.
    pub fn get_or_translate<T: Translator + ?Sized>(
        &mut self,
        chunk: &TranslationChunk,
        translator: &T,
        source_lang: &str,
    ) -> ChunkResult<TranslationChunk> {
        let id = chunk.chunk_id();
        if let Some(cached) = self.entries.get(&id) {
            if cached.is_translated() {
                debug!(chunk_id = %id, "chunk cache hit");
                return Ok(cached.clone());
            }
        }
        let translated = translate_chunk(chunk, translator, source_lang)?;
        self.insert(translated.clone());
        Ok(translated)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ChunkBuilder;
    use std::cell::Cell;

    struct CountingTranslator {
        calls: Cell<usize>,
    }

    impl CountingTranslator {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl Translator for CountingTranslator {
        fn translate(&self, text: &str, _: &str, _: &str) -> anyhow::Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(text.to_string())
        }
    }

    fn chunk_for(book: &str, start: usize) -> TranslationChunk {
        ChunkBuilder::new(book, "en")
            .build(start, &[format!("page {start}")])
            .unwrap()
    }

    #[test]
    fn stores_and_finds_chunks_by_id() {
        let mut store = ChunkStore::default();
        let chunk = chunk_for("book", 0);
        let id = chunk.chunk_id();
        store.insert(chunk);
        assert!(store.get(&id).is_some());
        assert!(store.get("book_9_9_en").is_none());
    }

    #[test]
    fn evicts_oldest_entries_beyond_capacity() {
        let mut store = ChunkStore::new(2);
        let first = chunk_for("book", 0);
        let first_id = first.chunk_id();
        store.insert(first);
        store.insert(chunk_for("book", 1));
        store.insert(chunk_for("book", 2));
        assert_eq!(store.len(), 2);
        assert!(store.get(&first_id).is_none());
    }

    #[test]
    fn evict_book_clears_only_that_book() {
        let mut store = ChunkStore::default();
        store.insert(chunk_for("keep", 0));
        store.insert(chunk_for("drop", 0));
        store.insert(chunk_for("drop", 1));
        store.evict_book("drop");
        assert_eq!(store.len(), 1);
        assert!(store.get(&chunk_for("keep", 0).chunk_id()).is_some());
    }

    #[test]
    fn read_through_translates_each_chunk_once() {
        let mut store = ChunkStore::default();
        let translator = CountingTranslator::new();
        let chunk = chunk_for("book", 0);

        let first = store.get_or_translate(&chunk, &translator, "auto").unwrap();
        let second = store.get_or_translate(&chunk, &translator, "auto").unwrap();
        assert!(first.is_translated());
        assert_eq!(second.translated_text(), first.translated_text());
        assert_eq!(translator.calls.get(), 1);
    }
}
