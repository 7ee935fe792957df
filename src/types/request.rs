//! Request types for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question request for a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Document to answer from
    pub document_id: Uuid,
    /// The question to answer
    pub question: String,
    /// Number of passages to retrieve; clamped to the configured maximum
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl AskRequest {
    /// Create a new request with default retrieval depth
    pub fn new(document_id: Uuid, question: impl Into<String>) -> Self {
        Self {
            document_id,
            question: question.into(),
            top_k: None,
        }
    }

    /// Set the number of passages to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }
}
