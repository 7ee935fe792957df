//! Document management, content and summary endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    ContentResponse, DocumentInfo, DocumentListResponse, DocumentStatus, Summary,
};

/// GET /api/documents - List all documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents: Vec<DocumentInfo> = state.store().list().iter().map(DocumentInfo::from).collect();
    let total_count = documents.len();

    Ok(Json(DocumentListResponse {
        documents,
        total_count,
    }))
}

/// GET /api/documents/:id - Get a document's metadata
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentInfo>> {
    let doc = state.store().get(&id)?;
    Ok(Json(DocumentInfo::from(&doc)))
}

/// GET /api/documents/:id/content - Full extracted text
///
/// Not found until extraction has completed; a failed document stays
/// inaccessible so the failure is not silently swallowed.
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentResponse>> {
    let doc = state.store().get(&id)?;

    match doc.status {
        DocumentStatus::Extracted | DocumentStatus::Indexed => Ok(Json(ContentResponse {
            content: doc.text,
        })),
        DocumentStatus::Pending | DocumentStatus::Failed => Err(Error::NotFound(id)),
    }
}

/// GET /api/documents/:id/summary - Structured summary, distinct from content
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Summary>> {
    let doc = state.store().get(&id)?;
    if doc.status != DocumentStatus::Indexed {
        return Err(Error::NotIndexed(id));
    }

    if let Some(cached) = state.summaries().get_if_fresh(&id, &doc.content_hash) {
        tracing::debug!(document_id = %id, "serving cached summary");
        return Ok(Json(cached));
    }

    let summary = state.summarizer().summarize(&doc).await?;
    state.summaries().insert(summary.clone());

    Ok(Json(summary))
}

/// DELETE /api/documents/:id - Delete a document, its index and summary
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let doc = state.delete_document(&id)?;

    tracing::info!(document_id = %id, filename = %doc.filename, "document deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "document_id": id,
        "filename": doc.filename,
    })))
}

/// DELETE /api/documents - Explicit session clear
pub async fn clear_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.clear_session();
    tracing::info!("session cleared");
    Json(serde_json::json!({ "success": true }))
}
