//! Query-time passage retrieval over built indexes

pub mod metrics;

use std::cmp::Ordering;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::index::IndexRegistry;
use crate::store::DocumentStore;
use crate::types::{DocumentStatus, Passage};

/// A retrieved passage with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    /// The retrieved passage
    pub passage: Passage,
    /// Relevance score (0.0-1.0, higher is better)
    pub score: f32,
}

/// Ranks a document's passages against a query.
///
/// Only serves documents in `Indexed` status whose registry entry matches
/// the document's current text; anything else is `NotIndexed`.
pub struct Retriever {
    store: Arc<DocumentStore>,
    registry: Arc<IndexRegistry>,
    config: RetrievalConfig,
}

impl Retriever {
    /// Create a retriever over a store and index registry
    pub fn new(
        store: Arc<DocumentStore>,
        registry: Arc<IndexRegistry>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Retrieve the top-k passages for a query, ranked by score descending
    /// with ties broken by sequence index ascending. Deterministic for
    /// identical inputs; fewer than k matches is not an error.
    pub fn retrieve(&self, id: &Uuid, query: &str, k: usize) -> Result<Vec<ScoredPassage>> {
        let doc = self.store.get(id)?;
        if doc.status != DocumentStatus::Indexed {
            return Err(Error::NotIndexed(*id));
        }

        let index = self.registry.get(id).ok_or(Error::NotIndexed(*id))?;
        if index.content_hash() != doc.content_hash {
            // Stale index: the document's text changed after the build.
            return Err(Error::NotIndexed(*id));
        }

        let k = k.min(self.config.max_top_k);
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<ScoredPassage> = index
            .score(query)
            .into_iter()
            .filter(|(score, _)| *score > self.config.min_score)
            .map(|(score, passage)| ScoredPassage {
                passage: passage.clone(),
                score,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.passage.seq.cmp(&b.passage.seq))
        });
        scored.truncate(k);

        tracing::debug!(
            document_id = %id,
            returned = scored.len(),
            "retrieval complete"
        );

        Ok(scored)
    }
}
