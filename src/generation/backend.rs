//! Pluggable generation backend seam

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// A language-generation capability the synthesizer and summarizer call into.
///
/// Implementations map their failures onto `GenerationTimeout` and
/// `GenerationUnavailable` so callers can differentiate retry strategies.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a completion for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Run a backend call under a hard time budget.
///
/// On timeout the call fails with `GenerationTimeout`; no partial output is
/// ever returned.
pub(crate) async fn generate_bounded(
    backend: &dyn GenerationBackend,
    budget: Duration,
    prompt: &str,
) -> Result<String> {
    match tokio::time::timeout(budget, backend.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(Error::GenerationTimeout(budget)),
    }
}
