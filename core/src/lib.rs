//! Inverted index for a personal command-line snippet store.
//!
//! Documents are short texts tagged by their significant words (or by custom
//! tags) and retrieved by boolean AND over those tags.

pub mod error;
pub mod index;
pub mod persist;
pub mod tags;

pub use error::{IndexError, Result};
pub use index::{parse_doc_id, DocId, InvertedIndex};
pub use persist::{deserialize, load_index, save_index, serialize};
pub use tags::{effective_terms, normalize_term, StopWords, TagPolicy};
