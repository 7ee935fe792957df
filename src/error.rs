//! Error types for the document assistant

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::types::DocumentStatus;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document assistant errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or malformed-request error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload format the extractor cannot handle
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Input that could not be parsed at all
    #[error("Corrupt input: {0}")]
    CorruptInput(String),

    /// Upload larger than the configured maximum
    #[error("Upload of {got} bytes exceeds the {limit} byte limit")]
    SizeExceeded { got: usize, limit: usize },

    /// Extracted text is empty or whitespace-only
    #[error("Document has no extractable text")]
    EmptyDocument,

    /// Unknown document identifier
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Operation requires an indexed document
    #[error("Document not indexed: {0}")]
    NotIndexed(Uuid),

    /// Generation backend exceeded its time budget
    #[error("Generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    /// Generation backend unreachable or returned a failure
    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),

    /// Illegal backward status transition
    #[error("Illegal status transition: {from:?} -> {to:?}")]
    InvalidStatus {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported(mime: impl Into<String>) -> Self {
        Self::UnsupportedFormat(mime.into())
    }

    /// Create a corrupt input error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptInput(message.into())
    }

    /// Create a generation-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::GenerationUnavailable(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable kind for this error
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::CorruptInput(_) => "corrupt_input",
            Error::SizeExceeded { .. } => "size_exceeded",
            Error::EmptyDocument => "empty_document",
            Error::NotFound(_) => "not_found",
            Error::NotIndexed(_) => "not_indexed",
            Error::GenerationTimeout(_) => "generation_timeout",
            Error::GenerationUnavailable(_) => "generation_unavailable",
            Error::InvalidStatus { .. } => "invalid_status",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::BAD_REQUEST,
            Error::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::CorruptInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NotIndexed(_) => StatusCode::CONFLICT,
            Error::GenerationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::GenerationUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidStatus { .. } => StatusCode::CONFLICT,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}
