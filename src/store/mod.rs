//! Document store: the single source of truth for uploaded documents

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Document, DocumentStatus, PageError, PageSpan};

/// Keyed table of documents.
///
/// Reads return clones and never block other documents. Writes to one
/// document go through the map's per-shard entry locks, so concurrent
/// writers racing on the same identifier serialize instead of interleaving,
/// while unrelated documents proceed independently.
pub struct DocumentStore {
    documents: DashMap<Uuid, Document>,
}

impl DocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Create a document from extracted text and return its generated ID.
    ///
    /// IDs are random, never derived from the filename, so re-uploading the
    /// same file yields a distinct document.
    pub fn create(
        &self,
        filename: impl Into<String>,
        byte_len: u64,
        text: String,
        pages: Vec<PageSpan>,
        failed_pages: Vec<PageError>,
    ) -> Uuid {
        let mut doc = Document::new(filename.into(), byte_len, text, pages);
        doc.failed_pages = failed_pages;
        let id = doc.id;
        self.documents.insert(id, doc);
        id
    }

    /// Fetch a document by ID
    pub fn get(&self, id: &Uuid) -> Result<Document> {
        self.documents
            .get(id)
            .map(|d| d.clone())
            .ok_or(Error::NotFound(*id))
    }

    /// Current status of a document
    pub fn status(&self, id: &Uuid) -> Result<DocumentStatus> {
        self.documents
            .get(id)
            .map(|d| d.status)
            .ok_or(Error::NotFound(*id))
    }

    /// Advance a document's status. Transitions are forward only; an illegal
    /// transition leaves the document untouched.
    pub fn set_status(&self, id: &Uuid, next: DocumentStatus) -> Result<()> {
        let mut entry = self.documents.get_mut(id).ok_or(Error::NotFound(*id))?;
        if !entry.status.can_transition(next) {
            return Err(Error::InvalidStatus {
                from: entry.status,
                to: next,
            });
        }
        entry.status = next;
        Ok(())
    }

    /// Mark a document failed. Terminal; a no-op for unknown or already
    /// failed documents.
    pub fn mark_failed(&self, id: &Uuid) {
        if let Some(mut entry) = self.documents.get_mut(id) {
            if entry.status.can_transition(DocumentStatus::Failed) {
                entry.status = DocumentStatus::Failed;
            }
        }
    }

    /// Remove a document
    pub fn delete(&self, id: &Uuid) -> Result<Document> {
        self.documents
            .remove(id)
            .map(|(_, doc)| doc)
            .ok_or(Error::NotFound(*id))
    }

    /// Remove every document (explicit session clear)
    pub fn clear(&self) {
        self.documents.clear();
    }

    /// All documents, in no particular order
    pub fn list(&self) -> Vec<Document> {
        self.documents.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn page(n: u32, start: usize, end: usize) -> PageSpan {
        PageSpan { page: n, start, end }
    }

    #[test]
    fn create_get_delete_roundtrip() {
        let store = DocumentStore::new();
        let id = store.create("a.pdf", 10, "text".into(), vec![page(1, 0, 4)], Vec::new());

        let doc = store.get(&id).unwrap();
        assert_eq!(doc.filename, "a.pdf");
        assert_eq!(doc.status, DocumentStatus::Pending);

        store.delete(&id).unwrap();
        assert!(matches!(store.get(&id), Err(Error::NotFound(_))));
    }

    #[test]
    fn status_transitions_are_forward_only() {
        let store = DocumentStore::new();
        let id = store.create("a.pdf", 10, "text".into(), Vec::new(), Vec::new());

        store.set_status(&id, DocumentStatus::Extracted).unwrap();
        store.set_status(&id, DocumentStatus::Indexed).unwrap();

        let err = store.set_status(&id, DocumentStatus::Extracted).unwrap_err();
        assert!(matches!(err, Error::InvalidStatus { .. }));
        assert_eq!(store.status(&id).unwrap(), DocumentStatus::Indexed);
    }

    #[test]
    fn failed_is_terminal() {
        let store = DocumentStore::new();
        let id = store.create("a.pdf", 10, "text".into(), Vec::new(), Vec::new());

        store.mark_failed(&id);
        assert_eq!(store.status(&id).unwrap(), DocumentStatus::Failed);

        assert!(store.set_status(&id, DocumentStatus::Extracted).is_err());
        // Repeated mark_failed is a no-op, not an error.
        store.mark_failed(&id);
        assert_eq!(store.status(&id).unwrap(), DocumentStatus::Failed);
    }

    #[test]
    fn failed_pages_are_persisted() {
        let store = DocumentStore::new();
        let id = store.create(
            "partial.pdf",
            10,
            "page two survived".into(),
            vec![page(2, 0, 17)],
            vec![PageError {
                page: 1,
                message: "content stream unreadable".into(),
            }],
        );

        let doc = store.get(&id).unwrap();
        assert_eq!(doc.failed_pages.len(), 1);
        assert_eq!(doc.failed_pages[0].page, 1);
        // The kept pages are still there alongside the failure record.
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = DocumentStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(&id), Err(Error::NotFound(_))));
        assert!(matches!(
            store.set_status(&id, DocumentStatus::Extracted),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn concurrent_uploads_stay_isolated() {
        let store = Arc::new(DocumentStore::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                let text = format!("document number {}", i);
                let id = store.create(format!("doc{}.txt", i), text.len() as u64, text, Vec::new(), Vec::new());
                store.set_status(&id, DocumentStatus::Extracted).unwrap();
                store.set_status(&id, DocumentStatus::Indexed).unwrap();
                (i, id)
            }));
        }

        let results: Vec<(i32, Uuid)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(store.len(), 8);

        for (i, id) in results {
            let doc = store.get(&id).unwrap();
            assert_eq!(doc.text, format!("document number {}", i));
            assert_eq!(doc.filename, format!("doc{}.txt", i));
            assert_eq!(doc.status, DocumentStatus::Indexed);
        }
    }

    #[test]
    fn clear_empties_the_store() {
        let store = DocumentStore::new();
        store.create("a.txt", 1, "a".into(), Vec::new(), Vec::new());
        store.create("b.txt", 1, "b".into(), Vec::new(), Vec::new());
        store.clear();
        assert!(store.is_empty());
    }
}
