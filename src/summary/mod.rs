//! Document summarization with a two-pass scheme for long documents

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::{GenerationConfig, SummaryConfig};
use crate::error::{Error, Result};
use crate::generation::{generate_bounded, GenerationBackend, PromptBuilder};
use crate::index::Chunker;
use crate::types::{Document, Summary};

/// Produces a structured summary of a document's full extracted text.
///
/// Documents within the input budget are summarized in one call. Longer
/// documents use two passes: each chunk is summarized, then the chunk
/// summaries are combined, bounding any single call's input size. The
/// sectioning is deterministic because chunk boundaries are.
pub struct Summarizer {
    backend: Arc<dyn GenerationBackend>,
    config: SummaryConfig,
    timeout: Duration,
}

impl Summarizer {
    /// Create a summarizer from configuration
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        config: SummaryConfig,
        generation: &GenerationConfig,
    ) -> Self {
        Self::with_timeout(backend, config, generation.timeout())
    }

    /// Create a summarizer with an explicit per-call time budget
    pub fn with_timeout(
        backend: Arc<dyn GenerationBackend>,
        config: SummaryConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            config,
            timeout,
        }
    }

    /// Summarize a document's extracted text
    pub async fn summarize(&self, doc: &Document) -> Result<Summary> {
        let text = doc.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let (summary_text, section_count) = if text.chars().count() <= self.config.input_budget_chars
        {
            let prompt = PromptBuilder::build_summary_prompt(text);
            let out = generate_bounded(self.backend.as_ref(), self.timeout, &prompt).await?;
            (out, 1)
        } else {
            self.summarize_two_pass(doc).await?
        };

        tracing::info!(
            document_id = %doc.id,
            sections = section_count,
            "summary generated"
        );

        Ok(Summary {
            document_id: doc.id,
            text: summary_text,
            section_count,
            content_hash: doc.content_hash.clone(),
            generated_at: Utc::now(),
        })
    }

    /// First summarize each chunk, then summarize the concatenation
    async fn summarize_two_pass(&self, doc: &Document) -> Result<(String, usize)> {
        let chunker = Chunker::new(self.config.chunk_window, self.config.chunk_overlap, 1);
        let chunks = chunker.chunk(doc);
        if chunks.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let section_count = chunks.len();
        tracing::debug!(document_id = %doc.id, sections = section_count, "two-pass summary");

        let futures: Vec<_> = chunks
            .iter()
            .map(|chunk| {
                let prompt = PromptBuilder::build_summary_prompt(chunk.text.trim());
                async move { generate_bounded(self.backend.as_ref(), self.timeout, &prompt).await }
            })
            .collect();

        let mut section_summaries = Vec::with_capacity(section_count);
        for result in join_all(futures).await {
            section_summaries.push(result?);
        }

        let reduce_prompt = PromptBuilder::build_reduce_prompt(&section_summaries);
        let combined = generate_bounded(self.backend.as_ref(), self.timeout, &reduce_prompt).await?;

        Ok((combined, section_count))
    }
}

/// Per-document summary cache keyed by the content hash the summary was
/// generated from. Failed generations are never cached.
pub struct SummaryCache {
    inner: RwLock<HashMap<Uuid, Summary>>,
}

impl SummaryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached summary only if it matches the document's current
    /// text; a stale entry is dropped.
    pub fn get_if_fresh(&self, id: &Uuid, content_hash: &str) -> Option<Summary> {
        {
            let cache = self.inner.read();
            match cache.get(id) {
                Some(summary) if summary.content_hash == content_hash => {
                    return Some(summary.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.inner.write().remove(id);
        None
    }

    /// Cache a generated summary
    pub fn insert(&self, summary: Summary) {
        self.inner.write().insert(summary.document_id, summary);
    }

    /// Drop a document's cached summary
    pub fn invalidate(&self, id: &Uuid) {
        self.inner.write().remove(id);
    }

    /// Drop every cached summary (session clear)
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and answers with a fixed marker
    struct Counting {
        calls: AtomicUsize,
    }

    impl Counting {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for Counting {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Echo a stable marker plus a slice of the prompt.
            Ok(format!("summary<{}>", prompt.len()))
        }
    }

    fn doc(text: String) -> Document {
        Document::new("doc.txt".into(), text.len() as u64, text, Vec::new())
    }

    fn config(budget: usize) -> SummaryConfig {
        SummaryConfig {
            input_budget_chars: budget,
            chunk_window: 200,
            chunk_overlap: 20,
        }
    }

    fn summarizer(backend: Arc<Counting>, budget: usize) -> Summarizer {
        Summarizer::with_timeout(backend, config(budget), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn short_documents_use_a_single_call() {
        let backend = Counting::new();
        let summary = summarizer(Arc::clone(&backend), 10_000)
            .summarize(&doc("a short document".into()))
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(summary.section_count, 1);
    }

    #[tokio::test]
    async fn long_documents_use_two_passes() {
        let backend = Counting::new();
        let text = "sentence with several words in it. ".repeat(40);
        let summary = summarizer(Arc::clone(&backend), 100)
            .summarize(&doc(text))
            .await
            .unwrap();

        // One call per section plus the reduce call.
        assert!(summary.section_count > 1);
        assert_eq!(
            backend.calls.load(Ordering::SeqCst),
            summary.section_count + 1
        );
    }

    #[tokio::test]
    async fn empty_document_fails() {
        let backend = Counting::new();
        let err = summarizer(Arc::clone(&backend), 100)
            .summarize(&doc("   \n ".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyDocument));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sectioning_is_deterministic() {
        let backend = Counting::new();
        let text = "repeatable content for sectioning. ".repeat(30);
        let s = summarizer(Arc::clone(&backend), 100);

        let first = s.summarize(&doc(text.clone())).await.unwrap();
        let second = s.summarize(&doc(text)).await.unwrap();
        assert_eq!(first.section_count, second.section_count);
    }

    #[test]
    fn cache_invalidates_on_content_change() {
        let cache = SummaryCache::new();
        let id = Uuid::new_v4();
        let summary = Summary {
            document_id: id,
            text: "cached".into(),
            section_count: 1,
            content_hash: "hash-a".into(),
            generated_at: Utc::now(),
        };
        cache.insert(summary);

        assert!(cache.get_if_fresh(&id, "hash-a").is_some());
        // Text changed: the stale entry is dropped, not served.
        assert!(cache.get_if_fresh(&id, "hash-b").is_none());
        assert!(cache.get_if_fresh(&id, "hash-a").is_none());
    }
}
