//! API routes

pub mod ask;
pub mod documents;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with a larger body limit for multipart payloads
        .route(
            "/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Document management
        .route("/documents", get(documents::list_documents))
        .route("/documents", delete(documents::clear_session))
        .route("/documents/:id", get(documents::get_document))
        .route("/documents/:id", delete(documents::delete_document))
        .route("/documents/:id/content", get(documents::get_content))
        .route("/documents/:id/summary", get(documents::get_summary))
        // Question answering
        .route("/ask", post(ask::ask_question))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "askdoc",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document assistant with grounded, citation-aware answers",
        "endpoints": {
            "POST /api/upload": "Upload and process a document",
            "GET /api/documents": "List all documents",
            "GET /api/documents/:id/content": "Full extracted text",
            "GET /api/documents/:id/summary": "Structured summary",
            "POST /api/ask": "Ask a question about a document",
            "DELETE /api/documents/:id": "Delete a document",
            "DELETE /api/documents": "Clear the session"
        }
    }))
}
