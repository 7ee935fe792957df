//! Core types for the document assistant

pub mod document;
pub mod request;
pub mod response;

pub use document::{hash_content, Document, DocumentStatus, PageError, PageSpan, Passage};
pub use request::AskRequest;
pub use response::{
    Answer, Citation, ContentResponse, DocumentInfo, DocumentListResponse, Summary,
    UploadResponse,
};
