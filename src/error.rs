//! Error types for the chunk/marker core.
//!
//! Only caller mistakes are surfaced as errors: indices outside a supported
//! range and reading a translation that does not exist yet. Runtime
//! degradation (markers stripped by the engine, paragraph counts drifting)
//! is never an error; those paths return partial or empty text instead.

use thiserror::Error;

/// Errors from the page marker codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("page index {index} exceeds the maximum markable index {max}")]
    IndexOutOfRange { index: usize, max: usize },
}

/// Errors from chunk construction and per-page extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("page index {index} outside chunk range {start}..={end}")]
    PageOutOfRange {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("chunk {chunk_id} has not been translated yet")]
    NotTranslated { chunk_id: String },

    #[error("cannot build a chunk from zero pages")]
    EmptyChunk,

    #[error("expected {expected} page break offsets, got {got}")]
    OffsetCountMismatch { expected: usize, got: usize },

    #[error("invalid page range: start {start} > end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error("translation engine failed: {0}")]
    Translation(String),
}

pub type ChunkResult<T> = Result<T, ChunkError>;
