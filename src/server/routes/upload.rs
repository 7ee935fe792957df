//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// POST /api/upload - Upload and process a document
///
/// Accepts the first file field of the multipart body; extraction, storage
/// and indexing run inline so the response reflects the final status.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Config(format!("invalid multipart body: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        let declared_mime = field
            .content_type()
            .map(|m| m.to_string())
            .or_else(|| {
                mime_guess::from_path(&filename)
                    .first_raw()
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Config(format!("failed to read upload: {}", e)))?;

        tracing::info!(filename, declared_mime, bytes = data.len(), "upload received");

        let doc = state.upload_document(&filename, &declared_mime, &data)?;
        let preview_chars = state.config().extraction.preview_chars;

        return Ok(Json(UploadResponse::from_document(&doc, preview_chars)));
    }

    Err(Error::Config("multipart body contains no file field".into()))
}
