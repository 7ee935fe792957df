//! Document, page span and passage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Processing status of a document
///
/// Transitions move forward only: `Pending -> Extracted -> Indexed`.
/// Any stage may fail into `Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Created, text not yet recorded as extracted
    Pending,
    /// Text and page offsets recorded
    Extracted,
    /// Retrieval index built; the only state queries are accepted in
    Indexed,
    /// Extraction or indexing failed; re-upload required
    Failed,
}

impl DocumentStatus {
    /// Whether a transition to `next` is legal
    pub fn can_transition(self, next: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, next),
            (Pending, Extracted) | (Extracted, Indexed) | (Pending, Failed) | (Extracted, Failed) | (Indexed, Failed)
        )
    }
}

/// Byte-offset range of one page within a document's extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    /// Page number (1-indexed)
    pub page: u32,
    /// Start byte offset in the extracted text
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// A page that could not be parsed during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    /// Page number (1-indexed)
    pub page: u32,
    /// Parser message
    pub message: String,
}

/// An uploaded document with its extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID, generated per upload
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Raw upload size in bytes
    pub byte_len: u64,
    /// Extracted plain text
    pub text: String,
    /// Page offsets into `text`
    pub pages: Vec<PageSpan>,
    /// Pages that failed to parse; the rest of the text was kept
    #[serde(default)]
    pub failed_pages: Vec<PageError>,
    /// Hash of the extracted text
    pub content_hash: String,
    /// Processing status
    pub status: DocumentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a new pending document
    pub fn new(filename: String, byte_len: u64, text: String, pages: Vec<PageSpan>) -> Self {
        let content_hash = hash_content(&text);
        Self {
            id: Uuid::new_v4(),
            filename,
            byte_len,
            text,
            pages,
            failed_pages: Vec::new(),
            content_hash,
            status: DocumentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Number of pages with extracted text
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page range covering the char range `start..end` of the text.
    /// Falls back to page 1 when no span overlaps (single-span fallback
    /// extraction, or offsets outside any page).
    pub fn page_range(&self, start: usize, end: usize) -> (u32, u32) {
        let mut lo: Option<u32> = None;
        let mut hi: Option<u32> = None;
        for span in &self.pages {
            if span.start < end && span.end > start {
                lo = Some(lo.map_or(span.page, |p| p.min(span.page)));
                hi = Some(hi.map_or(span.page, |p| p.max(span.page)));
            }
        }
        match (lo, hi) {
            (Some(a), Some(b)) => (a, b),
            _ => (1, 1),
        }
    }
}

/// A bounded span of a document's text used as the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Sequence index within the document
    pub seq: u32,
    /// Start byte offset in the document text
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// First page the passage spans
    pub page_start: u32,
    /// Last page the passage spans
    pub page_end: u32,
    /// Passage text
    pub text: String,
}

/// Hash extracted text for staleness detection
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_pages() -> Document {
        Document::new(
            "report.pdf".into(),
            100,
            "page one text page two text".into(),
            vec![
                PageSpan { page: 1, start: 0, end: 14 },
                PageSpan { page: 2, start: 14, end: 27 },
            ],
        )
    }

    #[test]
    fn status_moves_forward_only() {
        use DocumentStatus::*;
        assert!(Pending.can_transition(Extracted));
        assert!(Extracted.can_transition(Indexed));
        assert!(!Extracted.can_transition(Pending));
        assert!(!Indexed.can_transition(Extracted));
        assert!(!Indexed.can_transition(Pending));
    }

    #[test]
    fn failed_is_terminal() {
        use DocumentStatus::*;
        assert!(Indexed.can_transition(Failed));
        assert!(!Failed.can_transition(Pending));
        assert!(!Failed.can_transition(Indexed));
        assert!(!Failed.can_transition(Failed));
    }

    #[test]
    fn page_range_covers_overlapping_spans() {
        let doc = doc_with_pages();
        assert_eq!(doc.page_range(0, 10), (1, 1));
        assert_eq!(doc.page_range(20, 27), (2, 2));
        assert_eq!(doc.page_range(10, 20), (1, 2));
    }

    #[test]
    fn page_range_defaults_to_first_page() {
        let doc = Document::new("plain.txt".into(), 10, "hello".into(), Vec::new());
        assert_eq!(doc.page_range(0, 5), (1, 1));
    }

    #[test]
    fn ids_are_unique_per_upload() {
        let a = doc_with_pages();
        let b = doc_with_pages();
        assert_ne!(a.id, b.id);
        assert_eq!(a.content_hash, b.content_hash);
    }
}
