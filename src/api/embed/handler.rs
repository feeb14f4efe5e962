// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding endpoint handlers
//!
//! - `POST /api/embeddings`: all four submission fields required
//! - `POST /api/paper/embeddings`: abstract and/or conclusion
//!
//! Inference failures are returned as 500 with the failure text; nothing is
//! retried.

use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use super::request::{PaperEmbeddingRequest, SubmissionEmbeddingRequest};
use super::response::{EmbeddingsResponse, PaperEmbeddings, SubmissionEmbeddings};
use crate::api::extract::JsonPayload;
use crate::api::{ApiError, AppState};

/// POST /api/embeddings
///
/// # Request Body
/// ```json
/// {
///   "problemStatement": "...",
///   "proposedSolution": "...",
///   "description": "...",
///   "domain": "..."
/// }
/// ```
///
/// # Response Body
/// ```json
/// {"embeddings": {"problemStatement": [...], "proposedSolution": [...], "description": [...], "domain": [...]}}
/// ```
pub async fn embeddings_handler(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<Json<EmbeddingsResponse<SubmissionEmbeddings>>, ApiError> {
    let request = SubmissionEmbeddingRequest::from_payload(&body)?;

    let vectors = state
        .encoder
        .encode_batch(&request.texts())
        .await
        .map_err(|e| {
            error!("Error generating embeddings: {:#}", e);
            ApiError::from(e)
        })?;

    let embeddings = SubmissionEmbeddings::from_ordered(vectors)?;
    debug!("Generated submission embeddings ({} dimensions)", embeddings.domain.len());

    Ok(Json(EmbeddingsResponse { embeddings }))
}

/// POST /api/paper/embeddings
///
/// # Request Body
/// ```json
/// {"abstract": "...", "conclusion": "..."}
/// ```
/// At least one section must be a non-empty string; only supplied sections
/// appear in the response.
pub async fn paper_embeddings_handler(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<Json<EmbeddingsResponse<PaperEmbeddings>>, ApiError> {
    let request = PaperEmbeddingRequest::from_payload(&body)?;
    let sections = request.sections();
    let texts: Vec<String> = sections.iter().map(|(_, text)| text.clone()).collect();

    let vectors = state.encoder.encode_batch(&texts).await.map_err(|e| {
        error!("Error generating paper embeddings: {:#}", e);
        ApiError::from(e)
    })?;

    if vectors.len() != sections.len() {
        return Err(ApiError::Internal(format!(
            "Encoder returned {} embeddings, expected {}",
            vectors.len(),
            sections.len()
        )));
    }

    let mut embeddings = PaperEmbeddings::default();
    for ((name, _), vector) in sections.into_iter().zip(vectors) {
        embeddings.set(name, vector)?;
    }

    Ok(Json(EmbeddingsResponse { embeddings }))
}
