//! Page-synchronized translation core for a dual-language reader.
//!
//! Reading pages are batched into [`chunk::TranslationChunk`]s, sent whole
//! through an external [`translator::Translator`] for better contextual
//! quality, and split back into the original page boundaries afterwards.
//! Translation preserves neither offsets nor lengths, so boundaries are
//! recovered with invisible private-use-area markers ([`marker`]) and,
//! when an engine strips those, a blank-line paragraph-count heuristic
//! ([`paragraph`]).
//!
//! The crate does no I/O beyond reading its config file: pagination,
//! rendering, and the actual translation transport are all collaborators
//! behind plain-text seams.

pub mod builder;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod marker;
pub mod paragraph;
pub mod translator;

pub use builder::{ChunkBuilder, plan_chunks};
pub use cache::ChunkStore;
pub use chunk::{PageLayout, TranslationChunk};
pub use config::{TranslationConfig, load_config};
pub use error::{ChunkError, ChunkResult, MarkerError};
pub use translator::{Translator, translate_chunk};
