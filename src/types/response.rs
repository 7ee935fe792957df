//! Response types for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, DocumentStatus, PageError, Passage};

/// Citation derived from a retrieved passage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Passage sequence index within the document
    pub passage_seq: u32,
    /// First cited page
    pub page_start: u32,
    /// Last cited page
    pub page_end: u32,
    /// Snippet from the passage
    pub snippet: String,
    /// Snippet with highlighted query terms (`<mark>` tags)
    pub snippet_highlighted: String,
    /// Relevance score of the passage (0.0-1.0)
    pub score: f32,
}

const SNIPPET_CHARS: usize = 240;

impl Citation {
    /// Derive a citation from a passage and its relevance score
    pub fn from_passage(passage: &Passage, score: f32) -> Self {
        let snippet = truncate_snippet(&passage.text, SNIPPET_CHARS);
        Self {
            passage_seq: passage.seq,
            page_start: passage.page_start,
            page_end: passage.page_end,
            snippet_highlighted: snippet.clone(),
            snippet,
            score,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        if self.page_start == self.page_end {
            format!("[page {}]", self.page_start)
        } else {
            format!("[pages {}-{}]", self.page_start, self.page_end)
        }
    }

    /// Highlight query terms in the snippet
    pub fn highlight_terms(&mut self, terms: &[&str]) {
        let mut highlighted = self.snippet.clone();
        for term in terms {
            if term.len() < 3 {
                continue;
            }
            let re = regex::RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build();
            if let Ok(re) = re {
                highlighted = re
                    .replace_all(&highlighted, |caps: &regex::Captures| {
                        format!("<mark>{}</mark>", &caps[0])
                    })
                    .to_string();
            }
        }
        self.snippet_highlighted = highlighted;
    }
}

/// Truncate a snippet at a word boundary
fn truncate_snippet(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }

    if let Some(pos) = text[..end].rfind(' ') {
        return format!("{}...", &text[..pos]);
    }

    format!("{}...", &text[..end])
}

/// Synthesized answer with citations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Document the answer is grounded in
    pub document_id: Uuid,
    /// The question as asked
    pub question: String,
    /// Synthesized answer text
    pub answer: String,
    /// Citations, ordered by retrieval rank
    pub citations: Vec<Citation>,
    /// Whether the answer is supported by at least one retrieved passage
    pub grounded: bool,
}

impl Answer {
    /// Answer backed by retrieved passages
    pub fn new(
        document_id: Uuid,
        question: impl Into<String>,
        answer: String,
        citations: Vec<Citation>,
    ) -> Self {
        let grounded = !citations.is_empty();
        Self {
            document_id,
            question: question.into(),
            answer,
            citations,
            grounded,
        }
    }

    /// Deterministic answer for queries with no supporting passages.
    /// Never carries citations.
    pub fn insufficient(document_id: Uuid, question: impl Into<String>) -> Self {
        Self {
            document_id,
            question: question.into(),
            answer: "The document does not contain enough information to answer this question."
                .to_string(),
            citations: Vec::new(),
            grounded: false,
        }
    }
}

/// Structured summary of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Summarized document
    pub document_id: Uuid,
    /// Summary text
    pub text: String,
    /// Number of first-pass sections the summary was built from
    pub section_count: usize,
    /// Hash of the text the summary was generated from
    pub content_hash: String,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

/// Response from a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Generated document ID
    pub document_id: Uuid,
    /// Original filename
    pub filename: String,
    /// Raw upload size in bytes
    pub content_length: u64,
    /// Opening characters of the extracted text
    pub content_preview: String,
    /// Pages with extracted text
    pub page_count: u32,
    /// Pages that failed to parse; empty for a clean extraction
    pub failed_pages: Vec<PageError>,
}

impl UploadResponse {
    /// Build a response from a stored document
    pub fn from_document(doc: &Document, preview_chars: usize) -> Self {
        Self {
            document_id: doc.id,
            filename: doc.filename.clone(),
            content_length: doc.byte_len,
            content_preview: truncate_snippet(doc.text.trim_start(), preview_chars),
            page_count: doc.page_count(),
            failed_pages: doc.failed_pages.clone(),
        }
    }
}

/// Full extracted content of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    /// Extracted plain text
    pub content: String,
}

/// Document list item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document ID
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// Raw upload size in bytes
    pub byte_len: u64,
    /// Pages with extracted text
    pub page_count: u32,
    /// Processing status
    pub status: DocumentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentInfo {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            byte_len: doc.byte_len,
            page_count: doc.page_count(),
            status: doc.status,
            created_at: doc.created_at,
        }
    }
}

/// Response for listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// List of documents
    pub documents: Vec<DocumentInfo>,
    /// Total count
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageSpan;

    fn passage() -> Passage {
        Passage {
            seq: 3,
            start: 0,
            end: 52,
            page_start: 2,
            page_end: 4,
            text: "This is a test about climate change and warming.".to_string(),
        }
    }

    #[test]
    fn citation_carries_page_range() {
        let citation = Citation::from_passage(&passage(), 0.5);
        assert_eq!(citation.passage_seq, 3);
        assert_eq!(citation.format_inline(), "[pages 2-4]");
    }

    #[test]
    fn highlight_marks_query_terms() {
        let mut citation = Citation::from_passage(&passage(), 0.5);
        citation.highlight_terms(&["climate", "warming"]);
        assert!(citation.snippet_highlighted.contains("<mark>climate</mark>"));
        assert!(citation.snippet_highlighted.contains("<mark>warming</mark>"));
    }

    #[test]
    fn truncate_respects_word_boundaries() {
        let truncated = truncate_snippet("This is a very long snippet that needs truncating.", 20);
        assert!(truncated.len() <= 23);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn upload_response_surfaces_failed_pages() {
        let mut doc = Document::new(
            "partial.pdf".into(),
            100,
            "only page two came through".into(),
            vec![PageSpan { page: 2, start: 0, end: 26 }],
        );
        doc.failed_pages = vec![PageError {
            page: 1,
            message: "content stream unreadable".into(),
        }];

        let response = UploadResponse::from_document(&doc, 80);
        assert_eq!(response.page_count, 1);
        assert_eq!(response.failed_pages.len(), 1);
        assert_eq!(response.failed_pages[0].page, 1);
    }

    #[test]
    fn insufficient_answer_has_no_citations() {
        let answer = Answer::insufficient(Uuid::new_v4(), "anything?");
        assert!(answer.citations.is_empty());
        assert!(!answer.grounded);
    }
}
