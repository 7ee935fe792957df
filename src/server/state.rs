//! Application state wiring the pipeline stages together

use std::sync::Arc;

use uuid::Uuid;

use crate::config::AskdocConfig;
use crate::error::Result;
use crate::extraction::Extractor;
use crate::generation::{GenerationBackend, OllamaBackend, Synthesizer};
use crate::index::{Chunker, IndexRegistry, PassageIndex};
use crate::retrieval::Retriever;
use crate::store::DocumentStore;
use crate::summary::{SummaryCache, Summarizer};
use crate::types::{Document, DocumentStatus};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AskdocConfig,
    extractor: Extractor,
    chunker: Chunker,
    store: Arc<DocumentStore>,
    registry: Arc<IndexRegistry>,
    retriever: Retriever,
    synthesizer: Synthesizer,
    summarizer: Summarizer,
    summaries: SummaryCache,
}

impl AppState {
    /// Create application state with the configured Ollama backend
    pub fn new(config: AskdocConfig) -> Result<Self> {
        let backend: Arc<dyn GenerationBackend> = Arc::new(OllamaBackend::new(&config.generation)?);
        Self::with_backend(config, backend)
    }

    /// Create application state with an explicit generation backend
    pub fn with_backend(
        config: AskdocConfig,
        backend: Arc<dyn GenerationBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(DocumentStore::new());
        let registry = Arc::new(IndexRegistry::new());
        let retriever = Retriever::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.retrieval.clone(),
        );
        let synthesizer = Synthesizer::new(Arc::clone(&backend), &config.generation);
        let summarizer = Summarizer::new(
            Arc::clone(&backend),
            config.summary.clone(),
            &config.generation,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                extractor: Extractor::new(&config.extraction),
                chunker: Chunker::from_config(&config.chunking),
                store,
                registry,
                retriever,
                synthesizer,
                summarizer,
                summaries: SummaryCache::new(),
                config,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AskdocConfig {
        &self.inner.config
    }

    /// Get the document store
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get the index registry
    pub fn registry(&self) -> &IndexRegistry {
        &self.inner.registry
    }

    /// Get the retriever
    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    /// Get the answer synthesizer
    pub fn synthesizer(&self) -> &Synthesizer {
        &self.inner.synthesizer
    }

    /// Get the summarizer
    pub fn summarizer(&self) -> &Summarizer {
        &self.inner.summarizer
    }

    /// Get the summary cache
    pub fn summaries(&self) -> &SummaryCache {
        &self.inner.summaries
    }

    /// Run the full upload pipeline: extract, store, index.
    ///
    /// On an indexing failure the document is kept with `Failed` status so
    /// the error is observable on later access, and the error is surfaced
    /// to the uploader.
    pub fn upload_document(
        &self,
        filename: &str,
        declared_mime: &str,
        data: &[u8],
    ) -> Result<Document> {
        let extracted = self.inner.extractor.extract(data, declared_mime)?;
        if !extracted.report.failed_pages.is_empty() {
            tracing::warn!(
                filename,
                failed_pages = extracted.report.failed_pages.len(),
                "partial extraction, keeping good pages"
            );
        }

        let id = self.inner.store.create(
            filename,
            data.len() as u64,
            extracted.text,
            extracted.pages,
            extracted.report.failed_pages,
        );
        self.inner.store.set_status(&id, DocumentStatus::Extracted)?;

        let doc = self.inner.store.get(&id)?;
        match PassageIndex::build(&doc, &self.inner.chunker) {
            Ok(index) => {
                // The index is exposed before the status flips, so a reader
                // that sees `Indexed` always finds a complete index.
                self.inner.registry.insert(index);
                self.inner.store.set_status(&id, DocumentStatus::Indexed)?;
            }
            Err(e) => {
                self.inner.store.mark_failed(&id);
                tracing::error!(filename, document_id = %id, "indexing failed: {}", e);
                return Err(e);
            }
        }

        tracing::info!(
            filename,
            document_id = %id,
            pages = doc.page_count(),
            "document uploaded and indexed"
        );

        self.inner.store.get(&id)
    }

    /// Delete one document together with its index and cached summary
    pub fn delete_document(&self, id: &Uuid) -> Result<Document> {
        let doc = self.inner.store.delete(id)?;
        self.inner.registry.remove(id);
        self.inner.summaries.invalidate(id);
        Ok(doc)
    }

    /// Explicit session clear: drop all documents, indexes and summaries
    pub fn clear_session(&self) {
        self.inner.store.clear();
        self.inner.registry.clear();
        self.inner.summaries.clear();
    }
}
