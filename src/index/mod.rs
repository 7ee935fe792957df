//! Passage chunking and per-document retrieval indexes

mod chunker;
mod lexical;

pub use chunker::Chunker;
pub use lexical::{tokenize, IndexRegistry, PassageIndex};
