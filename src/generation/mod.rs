//! Answer synthesis over a pluggable generation backend

mod backend;
mod ollama;
mod prompt;
mod synthesizer;

pub(crate) use backend::generate_bounded;

pub use backend::GenerationBackend;
pub use ollama::OllamaBackend;
pub use prompt::PromptBuilder;
pub use synthesizer::Synthesizer;
