//! Configuration for the document assistant

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AskdocConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Extraction configuration
    pub extraction: ExtractionConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Generation backend configuration
    pub generation: GenerationConfig,
    /// Summarization configuration
    pub summary: SummaryConfig,
}

impl AskdocConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| Error::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.retrieval.max_top_k == 0 {
            return Err(Error::Config("retrieval.max_top_k must be at least 1".into()));
        }
        if self.generation.timeout_secs == 0 {
            return Err(Error::Config("generation.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes (multipart framing included)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 48 * 1024 * 1024,
        }
    }
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum document size in bytes, checked before any parse attempt
    pub max_file_size: usize,
    /// Length of the content preview returned on upload, in characters
    pub preview_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size: 32 * 1024 * 1024,
            preview_chars: 280,
        }
    }
}

/// Passage chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target window size in characters
    pub window_size: usize,
    /// Overlap between consecutive windows in characters
    pub overlap: usize,
    /// Passages with less trimmed text than this are skipped
    pub min_passage: usize,
}

impl ChunkingConfig {
    /// Overlap must stay a real fraction of the window: at least a tenth,
    /// strictly less than the whole.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::Config("chunking.window_size must be at least 1".into()));
        }
        if self.overlap >= self.window_size {
            return Err(Error::Config(
                "chunking.overlap must be smaller than chunking.window_size".into(),
            ));
        }
        if self.overlap * 10 < self.window_size {
            return Err(Error::Config(
                "chunking.overlap must be at least 10% of chunking.window_size".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_size: 800,
            overlap: 160,
            min_passage: 40,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Passages returned when the request does not ask for a count
    pub default_top_k: usize,
    /// Hard ceiling on requested passage counts
    pub max_top_k: usize,
    /// Passages scoring at or below this are dropped
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: 4,
            max_top_k: 8,
            min_score: 0.0,
        }
    }
}

/// Generation backend (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Time budget for a single generation call, in seconds
    pub timeout_secs: u64,
    /// Retries for unavailable-backend failures
    pub max_retries: u32,
}

impl GenerationConfig {
    /// Time budget as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Documents up to this many characters are summarized in one call
    pub input_budget_chars: usize,
    /// Window size for the chunked first pass of long documents
    pub chunk_window: usize,
    /// Overlap for the first-pass windows
    pub chunk_overlap: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            input_budget_chars: 6000,
            chunk_window: 2400,
            chunk_overlap: 240,
        }
    }
}
