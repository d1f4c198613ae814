//! TF-IDF indexing and search over a folder of plain-text documents.
//!
//! `build` turns a corpus into a [`TextIndex`] with a pool of worker
//! threads. `persist` round-trips that index through three delimited text
//! files, and `search` ranks documents against a tokenized query.

pub mod build;
pub mod index;
pub mod persist;
pub mod search;
pub mod tokenizer;

pub use build::build_index;
pub use index::{FrequencyMatrix, TextIndex, WordId, WordIndex};
