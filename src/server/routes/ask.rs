//! Question-answering endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{Answer, AskRequest};

/// POST /api/ask - Answer a question grounded in one document
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<Answer>> {
    let start = Instant::now();
    tracing::info!(document_id = %request.document_id, "question: \"{}\"", request.question);

    let k = request
        .top_k
        .unwrap_or(state.config().retrieval.default_top_k);

    let passages = state
        .retriever()
        .retrieve(&request.document_id, &request.question, k)?;

    let mut answer = state
        .synthesizer()
        .synthesize(request.document_id, &request.question, &passages)
        .await?;

    let terms: Vec<&str> = request.question.split_whitespace().collect();
    for citation in &mut answer.citations {
        citation.highlight_terms(&terms);
    }

    tracing::info!(
        document_id = %request.document_id,
        citations = answer.citations.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "question answered"
    );

    Ok(Json(answer))
}
