//! Grounded answer synthesis with derived citations

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::retrieval::ScoredPassage;
use crate::types::{Answer, Citation};

use super::backend::{generate_bounded, GenerationBackend};
use super::prompt::PromptBuilder;

/// Combines retrieved passages with a question into a grounded answer.
///
/// Citations are derived from the retrieved passages themselves, never
/// parsed out of generated free text, so they stay traceable regardless of
/// which backend is plugged in.
pub struct Synthesizer {
    backend: Arc<dyn GenerationBackend>,
    timeout: Duration,
}

impl Synthesizer {
    /// Create a synthesizer from configuration
    pub fn new(backend: Arc<dyn GenerationBackend>, config: &GenerationConfig) -> Self {
        Self::with_timeout(backend, config.timeout())
    }

    /// Create a synthesizer with an explicit time budget
    pub fn with_timeout(backend: Arc<dyn GenerationBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Synthesize an answer from the question and its retrieved passages.
    ///
    /// With no passages the answer is the deterministic insufficient-grounding
    /// response and carries no citations; the backend is not called.
    pub async fn synthesize(
        &self,
        document_id: Uuid,
        question: &str,
        passages: &[ScoredPassage],
    ) -> Result<Answer> {
        if passages.is_empty() {
            tracing::info!(document_id = %document_id, "no passages retrieved, declining to answer");
            return Ok(Answer::insufficient(document_id, question));
        }

        let context = PromptBuilder::build_context(passages);
        let prompt = PromptBuilder::build_answer_prompt(question, &context);

        let text = generate_bounded(self.backend.as_ref(), self.timeout, &prompt).await?;

        let citations: Vec<Citation> = passages
            .iter()
            .map(|s| Citation::from_passage(&s.passage, s.score))
            .collect();

        tracing::info!(
            document_id = %document_id,
            citations = citations.len(),
            "answer synthesized"
        );

        Ok(Answer::new(document_id, question, text, citations))
    }
}
