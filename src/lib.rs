//! Document assistant backend: upload a document, ask questions about it,
//! and get answers grounded in the document's own text.
//!
//! The pipeline runs extraction (PDF or plain text, with page offsets),
//! chunking into overlapping passages, lexical indexing, top-k retrieval,
//! and grounded answer synthesis against a local Ollama model. Every answer
//! carries citations derived from the retrieved passages, never from the
//! model's output.

pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod index;
pub mod retrieval;
pub mod server;
pub mod store;
pub mod summary;
pub mod types;

pub use config::AskdocConfig;
pub use error::{Error, Result};
