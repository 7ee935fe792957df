//! Lexical passage index and the per-document index registry

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Document, Passage};

use super::chunker::Chunker;

/// Lowercase alphanumeric terms of a text
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Retrieval index over one document's passages.
///
/// Built whole from a live document; never patched. The content hash records
/// which text it was built from so staleness is detectable.
pub struct PassageIndex {
    document_id: Uuid,
    content_hash: String,
    passages: Vec<Passage>,
    terms: Vec<HashSet<String>>,
}

impl PassageIndex {
    /// Build an index from a document's text.
    ///
    /// Fails with `EmptyDocument` when the text is empty or whitespace-only.
    pub fn build(doc: &Document, chunker: &Chunker) -> Result<Self> {
        if doc.text.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        let passages = chunker.chunk(doc);
        if passages.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let terms = passages
            .iter()
            .map(|p| tokenize(&p.text).into_iter().collect())
            .collect();

        tracing::debug!(
            document_id = %doc.id,
            passages = passages.len(),
            "passage index built"
        );

        Ok(Self {
            document_id: doc.id,
            content_hash: doc.content_hash.clone(),
            passages,
            terms,
        })
    }

    /// Document this index was built for
    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    /// Hash of the text this index was built from
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The indexed passages, in sequence order
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Number of passages
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the index holds no passages
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Score every passage against a query by term overlap.
    ///
    /// Score is |query ∩ passage| / |query|; an empty query scores nothing.
    pub fn score(&self, query: &str) -> Vec<(f32, &Passage)> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        if query_terms.is_empty() {
            return Vec::new();
        }

        self.passages
            .iter()
            .zip(&self.terms)
            .map(|(passage, terms)| {
                let hits = query_terms.iter().filter(|t| terms.contains(*t)).count();
                (hits as f32 / query_terms.len() as f32, passage)
            })
            .collect()
    }
}

/// Per-document registry of built indexes.
///
/// An index is inserted only after it is fully built, so readers never
/// observe a partial index.
pub struct IndexRegistry {
    indexes: DashMap<Uuid, Arc<PassageIndex>>,
}

impl IndexRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            indexes: DashMap::new(),
        }
    }

    /// Expose a fully built index, replacing any stale one for the document
    pub fn insert(&self, index: PassageIndex) {
        self.indexes.insert(index.document_id(), Arc::new(index));
    }

    /// Look up the index for a document
    pub fn get(&self, id: &Uuid) -> Option<Arc<PassageIndex>> {
        self.indexes.get(id).map(|e| Arc::clone(e.value()))
    }

    /// Drop the index for a document
    pub fn remove(&self, id: &Uuid) {
        self.indexes.remove(id);
    }

    /// Drop every index (session clear)
    pub fn clear(&self) {
        self.indexes.clear();
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker() -> Chunker {
        Chunker::new(200, 40, 10)
    }

    fn doc(text: &str) -> Document {
        Document::new("test.txt".into(), text.len() as u64, text.into(), Vec::new())
    }

    #[test]
    fn tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("Climate data shows a 2% rise."),
            vec!["climate", "data", "shows", "a", "2", "rise"]
        );
    }

    #[test]
    fn empty_text_fails_to_index() {
        assert!(matches!(
            PassageIndex::build(&doc(""), &chunker()),
            Err(Error::EmptyDocument)
        ));
        assert!(matches!(
            PassageIndex::build(&doc("  \n\t "), &chunker()),
            Err(Error::EmptyDocument)
        ));
    }

    #[test]
    fn scoring_rewards_term_overlap() {
        let index = PassageIndex::build(
            &doc("The quick brown fox jumps over the lazy dog"),
            &chunker(),
        )
        .unwrap();

        let scored = index.score("quick fox");
        assert_eq!(scored.len(), 1);
        assert!((scored[0].0 - 1.0).abs() < f32::EPSILON);

        let scored = index.score("quick elephant");
        assert!((scored[0].0 - 0.5).abs() < f32::EPSILON);

        let scored = index.score("submarine");
        assert_eq!(scored[0].0, 0.0);
    }

    #[test]
    fn empty_query_scores_nothing() {
        let index = PassageIndex::build(&doc("some text here"), &chunker()).unwrap();
        assert!(index.score("   !!! ").is_empty());
    }

    #[test]
    fn rebuild_is_equivalent() {
        let d = doc(&"alpha beta gamma delta ".repeat(40));
        let chunker = chunker();
        let first = PassageIndex::build(&d, &chunker).unwrap();
        let second = PassageIndex::build(&d, &chunker).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.passages().iter().zip(second.passages()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn registry_replaces_stale_indexes() {
        let registry = IndexRegistry::new();
        let d = doc("original text for the index");
        let index = PassageIndex::build(&d, &chunker()).unwrap();
        registry.insert(index);
        assert!(registry.get(&d.id).is_some());

        let mut changed = d.clone();
        changed.text = "completely different text now".into();
        changed.content_hash = crate::types::hash_content(&changed.text);
        let rebuilt = PassageIndex::build(&changed, &chunker()).unwrap();
        registry.insert(rebuilt);

        let current = registry.get(&d.id).unwrap();
        assert_eq!(current.content_hash(), changed.content_hash);

        registry.remove(&d.id);
        assert!(registry.get(&d.id).is_none());
    }
}
